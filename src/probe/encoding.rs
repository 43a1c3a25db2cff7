use encoding_rs::GBK;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyCharset {
    Gb2312,
    Gbk,
}

impl LegacyCharset {
    pub fn label(&self) -> &'static str {
        match self {
            LegacyCharset::Gb2312 => "gb2312",
            LegacyCharset::Gbk => "gbk",
        }
    }
}

/// Look for a GB2312/GBK charset declaration in the Content-Type header or in the
/// provisionally decoded body. gb2312 wins when both appear.
pub fn detect_legacy_charset(content_type: Option<&str>, provisional: &str) -> Option<LegacyCharset> {
    let ct = content_type.map(|c| c.to_lowercase()).unwrap_or_default();
    let body = provisional.to_lowercase();
    if ct.contains("charset=gb2312") || body.contains("charset=gb2312") {
        Some(LegacyCharset::Gb2312)
    } else if ct.contains("charset=gbk") || body.contains("charset=gbk") {
        Some(LegacyCharset::Gbk)
    } else {
        None
    }
}

/// Decode a response body for signature matching.
///
/// Best-effort: the body is first read as lossy UTF-8 and scanned for a legacy Chinese
/// charset declaration; if one is found the bytes are decoded again as GBK (a superset
/// of GB2312). Declarations outside the scanned forms, or pages that lie about their
/// charset, still come out mis-decoded.
pub fn decode_body(content_type: Option<&str>, bytes: &[u8]) -> String {
    let provisional = String::from_utf8_lossy(bytes);
    match detect_legacy_charset(content_type, &provisional) {
        Some(charset) => {
            tracing::debug!(charset = charset.label(), "decoding body with legacy charset");
            let (text, _, _) = GBK.decode(bytes);
            text.into_owned()
        }
        None => provisional.into_owned(),
    }
}
