use qrtrack_types::{CodeValue, Detection, WifiEncryption};

/// URL carried by the code, either parsed by the analyzer or sniffed from the raw text
pub fn extract_url(detection: &Detection) -> Option<String> {
    if let Some(CodeValue::Url { url }) = &detection.value {
        return Some(url.clone());
    }

    let raw = detection.text.as_deref()?;
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }

    None
}

pub fn extract_wifi(detection: &Detection) -> Option<String> {
    let Some(CodeValue::Wifi {
        ssid,
        password,
        encryption,
    }) = &detection.value
    else {
        return None;
    };

    let kind = match encryption {
        WifiEncryption::Open => "Open",
        WifiEncryption::Wpa => "WPA",
        WifiEncryption::Wep => "WEP",
        WifiEncryption::Unknown => "Unknown",
    };

    Some(format!("SSID: {ssid}\nPassword: {password}\nType: {kind}"))
}

pub fn extract_contact(detection: &Detection) -> Option<String> {
    let Some(CodeValue::Contact {
        name,
        phones,
        emails,
    }) = &detection.value
    else {
        return None;
    };

    Some(format!(
        "Name: {name}\nPhone: {}\nEmail: {}",
        phones.join(", "),
        emails.join(", ")
    ))
}

/// Human-readable details for the confirmation listing
pub fn describe(detection: &Detection) -> Option<String> {
    extract_url(detection)
        .map(|url| format!("URL: {url}"))
        .or_else(|| extract_wifi(detection))
        .or_else(|| extract_contact(detection))
}
