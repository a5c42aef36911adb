use crate::client::{BackendClient, ClientError, UploadedFile};
use crate::models::{ExtractionResult, FieldErrors, NewProcurementRequest, ProcurementRequest};
use crate::service::{DocumentIntake, LineEdit, OrderLineEditor, OrderLineError, OrderLineSnapshot, UploadOrigin};
use thiserror::Error;
use validator::Validate;

pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to create request. Please try again.";

/// 表单中的文本字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFields {
    pub requestor_name: String,
    pub title: String,
    pub vendor_name: String,
    pub vat_id: String,
    pub commodity_group: String,
    pub department: String,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form has invalid fields: {0}")]
    Invalid(FieldErrors),
    #[error("Failed to create request. Please try again.")]
    Backend(#[source] ClientError),
}

/// 新建申请页: 文档上传预填 + 订单行编辑 + 提交
#[derive(Debug)]
pub struct NewRequestPage {
    client: BackendClient,
    intake: DocumentIntake,
    pub fields: RequestFields,
    lines: OrderLineEditor,
    field_errors: FieldErrors,
    upload_error: Option<String>,
    submit_error: Option<String>,
    document_processed: bool,
}

impl NewRequestPage {
    pub fn new(client: BackendClient, intake: DocumentIntake) -> Self {
        Self {
            client,
            intake,
            fields: RequestFields::default(),
            lines: OrderLineEditor::new(),
            field_errors: FieldErrors::default(),
            upload_error: None,
            submit_error: None,
            document_processed: false,
        }
    }

    pub fn lines(&self) -> &OrderLineEditor {
        &self.lines
    }

    pub fn add_line(&mut self) -> OrderLineSnapshot {
        self.lines.add_line()
    }

    pub fn remove_line(&mut self, index: usize) -> Result<OrderLineSnapshot, OrderLineError> {
        self.lines.remove_line(index)
    }

    pub fn update_line(
        &mut self,
        index: usize,
        edit: LineEdit,
    ) -> Result<OrderLineSnapshot, OrderLineError> {
        self.lines.update_line(index, edit)
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn document_processed(&self) -> bool {
        self.document_processed
    }

    /// 用解析结果预填; 只覆盖解析出的非空字段, 订单行非空时整体替换
    pub fn apply_extraction(&mut self, result: ExtractionResult) {
        for (target, value) in [
            (&mut self.fields.vendor_name, result.vendor_name),
            (&mut self.fields.vat_id, result.vat_id),
            (&mut self.fields.department, result.department),
        ] {
            if !value.trim().is_empty() {
                *target = value;
            }
        }
        if let Ok(lines) = OrderLineEditor::from_lines(result.order_lines) {
            self.lines = lines;
        }
    }

    pub async fn upload(&mut self, file: UploadedFile, origin: UploadOrigin) {
        self.upload_error = None;
        match self.intake.process(file, origin).await {
            Ok(result) => {
                self.apply_extraction(result);
                self.document_processed = true;
            }
            Err(err) => {
                tracing::warn!(error = ?err, "document upload failed");
                self.upload_error = Some(err.to_string());
            }
        }
    }

    /// 组装请求体并校验, 总额取订单行小计之和
    pub fn validate(&self) -> Result<NewProcurementRequest, FieldErrors> {
        let fields = self.fields.clone();
        let request = NewProcurementRequest {
            requestor_name: fields.requestor_name,
            title: fields.title,
            vendor_name: fields.vendor_name,
            vat_id: fields.vat_id,
            commodity_group: fields.commodity_group,
            order_lines: self.lines.lines().to_vec(),
            total_cost: self.lines.grand_total(),
            department: fields.department,
        };
        request.validate().map_err(FieldErrors::from)?;
        Ok(request)
    }

    pub async fn submit(&mut self) -> Result<ProcurementRequest, SubmitError> {
        self.submit_error = None;
        let request = match self.validate() {
            Ok(request) => {
                self.field_errors = FieldErrors::default();
                request
            }
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(SubmitError::Invalid(errors));
            }
        };

        match self.client.create_request(&request).await {
            Ok(created) => {
                tracing::info!(id = ?created.id, "procurement request created");
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to create request");
                self.submit_error = Some(SUBMIT_FAILED_MESSAGE.to_string());
                Err(SubmitError::Backend(err))
            }
        }
    }
}
