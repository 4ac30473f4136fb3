// classify.rs — HTTP 响应内容分析模块
// 根据 Content-Type 判断响应类型并生成可读摘要；图片只解码不显示，显示由调用方决定

use image::DynamicImage;
use rust_i18n::t;

/// 文本类响应摘录的最大字符数
pub const EXCERPT_CHARS: usize = 200;

/// 一次 HTTP 请求的原始结果
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// 按内容类型分类后的响应
#[derive(Debug)]
pub enum Classification {
    /// 非 200 状态码
    Failure(u16),
    Json(serde_json::Value),
    /// 声明为 JSON 但无法解析
    InvalidJson,
    Html(String),
    Image(DynamicImage),
    /// 声明为图片但无法解码
    InvalidImage(String),
    Plain(String),
    Unknown(String),
}

/// 分类结果连同状态码与内容类型
#[derive(Debug)]
pub struct Report {
    pub status: u16,
    pub content_type: String,
    pub kind: Classification,
}

/// 分析响应
///
/// 判断顺序：状态码 → json → html → image → plain → 未知。
/// 任何解析失败都体现在返回值里，不会 panic。
pub fn classify(response: &RawResponse) -> Report {
    let content_type = response.content_type.to_lowercase();

    let kind = if response.status != 200 {
        Classification::Failure(response.status)
    } else if content_type.contains("json") {
        match serde_json::from_slice(&response.body) {
            Ok(value) => Classification::Json(value),
            Err(_) => Classification::InvalidJson,
        }
    } else if content_type.contains("html") {
        Classification::Html(excerpt(&response.body))
    } else if content_type.contains("image") {
        match image::load_from_memory(&response.body) {
            Ok(img) => Classification::Image(img),
            Err(e) => Classification::InvalidImage(e.to_string()),
        }
    } else if content_type.contains("plain") {
        Classification::Plain(excerpt(&response.body))
    } else {
        Classification::Unknown(excerpt(&response.body))
    };

    Report {
        status: response.status,
        content_type,
        kind,
    }
}

impl Report {
    /// 生成多行文本描述
    pub fn describe(&self) -> String {
        let body = match &self.kind {
            Classification::Failure(code) => return t!("error_status", code => code).to_string(),
            Classification::Json(value) => t!("inspect_json", body => value).to_string(),
            Classification::InvalidJson => t!("inspect_invalid_json").to_string(),
            Classification::Html(text) => t!("inspect_html", body => text).to_string(),
            Classification::Image(img) => {
                t!("inspect_image", width => img.width(), height => img.height()).to_string()
            }
            Classification::InvalidImage(reason) => {
                t!("inspect_invalid_image", reason => reason).to_string()
            }
            Classification::Plain(text) => t!("inspect_plain", body => text).to_string(),
            Classification::Unknown(text) => t!("inspect_unknown", body => text).to_string(),
        };

        let header = t!(
            "inspect_header",
            status => self.status,
            content_type => self.content_type
        );
        format!("{}\n{}", header, body)
    }
}

/// 截取正文前 EXCERPT_CHARS 个字符
/// 按 char 截断，多字节字符不会被切开；非法 UTF-8 以替换字符代替
pub fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut chars = text.chars();
    let mut out: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn response(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> RawResponse {
        RawResponse {
            status,
            content_type: content_type.to_string(),
            body: body.into(),
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(3, 2));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn non_200_stops_before_content_type() {
        let report = classify(&response(404, "application/json", "{}"));
        assert!(matches!(report.kind, Classification::Failure(404)));
        assert!(report.describe().contains("404"));
    }

    #[test]
    fn unparsable_json_is_reported_not_raised() {
        let report = classify(&response(200, "application/json", "{not json"));
        assert!(matches!(report.kind, Classification::InvalidJson));
        assert!(report.describe().contains("JSON"));
    }

    #[test]
    fn json_is_parsed() {
        let report = classify(&response(200, "application/json; charset=utf-8", r#"{"a":1}"#));
        match report.kind {
            Classification::Json(v) => assert_eq!(v["a"], 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn content_type_is_case_insensitive() {
        let report = classify(&response(200, "Text/HTML", "<p>hi</p>"));
        assert_eq!(report.content_type, "text/html");
        assert!(matches!(report.kind, Classification::Html(ref t) if t == "<p>hi</p>"));
    }

    #[test]
    fn json_wins_over_html() {
        let report = classify(&response(200, "application/json+html", "[]"));
        assert!(matches!(report.kind, Classification::Json(_)));
    }

    #[test]
    fn image_is_decoded() {
        let report = classify(&response(200, "image/png", png_bytes()));
        match report.kind {
            Classification::Image(img) => {
                assert_eq!(img.width(), 3);
                assert_eq!(img.height(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn broken_image_is_reported() {
        let report = classify(&response(200, "image/jpeg", vec![0u8, 1, 2, 3]));
        assert!(matches!(report.kind, Classification::InvalidImage(_)));
    }

    #[test]
    fn plain_and_unknown_are_excerpted() {
        let long = "x".repeat(500);
        let plain = classify(&response(200, "text/plain", long.clone()));
        match plain.kind {
            Classification::Plain(text) => assert_eq!(text.chars().count(), EXCERPT_CHARS + 3),
            other => panic!("unexpected {:?}", other),
        }

        let unknown = classify(&response(200, "application/octet-stream", "abc"));
        assert!(matches!(unknown.kind, Classification::Unknown(ref t) if t == "abc"));
    }

    #[test]
    fn excerpt_respects_multibyte_boundaries() {
        let body = "壁纸".repeat(150);
        let out = excerpt(body.as_bytes());
        assert!(out.ends_with("..."));
        assert_eq!(out.trim_end_matches("...").chars().count(), EXCERPT_CHARS);
    }

    #[test]
    fn excerpt_tolerates_invalid_utf8() {
        let out = excerpt(&[0xff, 0xfe, b'o', b'k']);
        assert!(out.ends_with("ok"));
    }
}
