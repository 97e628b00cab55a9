//! 待提交的候选文件与文件类型识别

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 图片类扩展名（走视觉接口）
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "ico", "webp",
];

/// 文件内容句柄
#[derive(Clone)]
pub enum Payload {
    /// 内存中的字节
    Inline(Arc<[u8]>),
    /// 磁盘路径，上传时再读取
    File { path: PathBuf },
}

impl Payload {
    pub fn inline(bytes: impl Into<Vec<u8>>) -> Self {
        Payload::Inline(Arc::from(bytes.into()))
    }

    /// 内存字节的长度；路径引用返回 None
    pub fn inline_len(&self) -> Option<u64> {
        match self {
            Payload::Inline(bytes) => Some(bytes.len() as u64),
            Payload::File { .. } => None,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Inline(bytes) => write!(f, "Inline({} bytes)", bytes.len()),
            Payload::File { path } => write!(f, "File({})", path.display()),
        }
    }
}

/// 候选文件，校验通过后才会进入登记表
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub name: Option<String>,
    pub size: Option<u64>,
    pub payload: Option<Payload>,
    /// 加载阶段的失败原因，存在时校验直接拒绝
    pub load_error: Option<String>,
}

impl Candidate {
    /// 内存中的文件，大小取字节长度
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let payload = Payload::inline(bytes);
        Self {
            name: Some(name.into()),
            size: payload.inline_len(),
            payload: Some(payload),
            load_error: None,
        }
    }

    /// 仅有名称引用的文件
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            size: None,
            payload: None,
            load_error: None,
        }
    }

    /// 磁盘文件
    pub fn from_path(path: impl Into<PathBuf>, size: Option<u64>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());
        Self {
            name,
            size,
            payload: Some(Payload::File { path }),
            load_error: None,
        }
    }

    /// 无法读取的磁盘文件，保留名称以便报告
    pub fn unreadable(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            name: path.file_name().map(|n| n.to_string_lossy().to_string()),
            size: None,
            payload: None,
            load_error: Some(reason.into()),
        }
    }

    /// 有效大小：声明的大小，缺省时取内存字节长度
    pub fn effective_size(&self) -> Option<u64> {
        self.size
            .or_else(|| self.payload.as_ref().and_then(Payload::inline_len))
    }

    /// 去除首尾空白后的文件名
    pub fn resolved_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// 内容类别，决定调用哪个提取接口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClass {
    /// 图片及 PDF（后端按页渲染为图片）
    Image,
    /// 结构化文档
    Document,
}

impl ContentClass {
    pub fn from_name(name: &str) -> Self {
        match file_extension(name).as_deref() {
            Some("pdf") => ContentClass::Image,
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => ContentClass::Image,
            _ => ContentClass::Document,
        }
    }
}

/// 小写扩展名，不含点；没有扩展名时返回 None
pub fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// 文档类型的展示名称
pub fn document_type_label(name: &str) -> &'static str {
    match file_extension(name).as_deref() {
        Some("pdf") => "PDF 文档",
        Some("dwg") | Some("dxf") => "AutoCAD 图纸",
        Some("arp") => "ARP 工程预算",
        Some("gsfx") => "GSFX 档案",
        Some("xml") => "XML 文档",
        Some("rtf") => "RTF 文档",
        Some("xlsx") => "Excel 表格",
        Some("docx") => "Word 文档",
        Some("json") => "JSON 数据",
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => "图片",
        _ => "未知类型",
    }
}
