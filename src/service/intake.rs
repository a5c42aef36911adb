use crate::client::{BackendClient, ClientError, UploadedFile};
use crate::config::IntakeConfig;
use crate::models::ExtractionResult;
use std::str::FromStr;
use thiserror::Error;

/// 允许上传的扩展名
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

pub const UNSUPPORTED_FILE_MESSAGE: &str = "Please upload a PDF, DOC, DOCX, or TXT file";

/// 文件来源: 拖拽 / 文件选择框
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadOrigin {
    DragAndDrop,
    #[default]
    FilePicker,
}

impl FromStr for UploadOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" | "drag-and-drop" => Ok(Self::DragAndDrop),
            "picker" | "file-picker" => Ok(Self::FilePicker),
            other => Err(format!("unknown upload origin: {other}")),
        }
    }
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Please upload a PDF, DOC, DOCX, or TXT file")]
    UnsupportedFileType { file_name: String },
    #[error("File exceeds the {limit_mb} MB upload limit")]
    TooLarge { limit_mb: u64 },
    #[error("The uploaded file is empty")]
    Empty,
    #[error("Unsupported content type: {content_type}")]
    InvalidContentType { content_type: String },
    #[error("Failed to process document: {0}")]
    Rejected(String),
    /// 解析服务返回的不是合法的结果 JSON; 细节只记日志
    #[error("Failed to process document")]
    Malformed(#[source] serde_json::Error),
    #[error("Invalid extraction result: {0}")]
    InvalidResult(String),
    #[error("Failed to process document")]
    Unavailable(#[source] ClientError),
}

impl IntakeError {
    /// 是否为上传前的本地拒绝 (未发起网络请求)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFileType { .. }
                | Self::TooLarge { .. }
                | Self::Empty
                | Self::InvalidContentType { .. }
        )
    }
}

pub fn has_allowed_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}

/// 文档解析流程: 本地校验 -> multipart 转发 -> 解析并校验结果
#[derive(Debug, Clone)]
pub struct DocumentIntake {
    client: BackendClient,
    max_file_size_mb: u64,
    validate_picker_uploads: bool,
}

impl DocumentIntake {
    pub fn new(client: BackendClient, config: &IntakeConfig) -> Self {
        Self {
            client,
            max_file_size_mb: config.max_file_size_mb,
            validate_picker_uploads: config.validate_picker_uploads,
        }
    }

    pub fn max_file_size_bytes(&self) -> usize {
        (self.max_file_size_mb as usize).saturating_mul(1024 * 1024)
    }

    pub fn check(&self, file: &UploadedFile, origin: UploadOrigin) -> Result<(), IntakeError> {
        let check_extension = match origin {
            UploadOrigin::DragAndDrop => true,
            UploadOrigin::FilePicker => self.validate_picker_uploads,
        };
        if check_extension && !has_allowed_extension(&file.file_name) {
            return Err(IntakeError::UnsupportedFileType {
                file_name: file.file_name.clone(),
            });
        }
        if let Some(content_type) = file.content_type.as_deref() {
            if content_type.parse::<mime::Mime>().is_err() {
                return Err(IntakeError::InvalidContentType {
                    content_type: content_type.to_string(),
                });
            }
        }
        if file.bytes.is_empty() {
            return Err(IntakeError::Empty);
        }
        if file.bytes.len() > self.max_file_size_bytes() {
            return Err(IntakeError::TooLarge {
                limit_mb: self.max_file_size_mb,
            });
        }
        Ok(())
    }

    pub async fn process(
        &self,
        file: UploadedFile,
        origin: UploadOrigin,
    ) -> Result<ExtractionResult, IntakeError> {
        if let Err(err) = self.check(&file, origin) {
            tracing::info!(file = %file.file_name, ?origin, "upload rejected: {}", err);
            return Err(err);
        }

        tracing::info!(
            file = %file.file_name,
            size = file.bytes.len(),
            ?origin,
            "processing document"
        );
        let (status, text) = self
            .client
            .submit_document(file)
            .await
            .map_err(IntakeError::Unavailable)?;

        if !status.is_success() {
            tracing::warn!(%status, "extraction service failed: {}", text);
            return Err(IntakeError::Rejected(text));
        }
        parse_extraction(&text)
    }
}

/// 解析并校验解析服务返回的 JSON
pub fn parse_extraction(text: &str) -> Result<ExtractionResult, IntakeError> {
    let result: ExtractionResult = serde_json::from_str(text).map_err(|e| {
        tracing::warn!(error = %e, "extraction service returned a malformed result");
        IntakeError::Malformed(e)
    })?;
    result.check_amounts().map_err(IntakeError::InvalidResult)?;
    Ok(result)
}
