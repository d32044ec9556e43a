use crate::utils::error::{PriceError, Result};
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PriceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PriceError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PriceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PriceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PriceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse::<SocketAddr>()
        .map_err(|e| PriceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PriceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PriceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_ascending(field_name: &str, values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(PriceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{:?}", values),
            reason: "Values must be finite and positive".to_string(),
        });
    }
    if values.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(PriceError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{:?}", values),
            reason: "Values must be strictly ascending".to_string(),
        });
    }
    Ok(())
}

// 以下為請求欄位的檢查，錯誤會以 400 回報

/// 0/1 旗標
pub fn validate_flag(field_name: &str, value: u8) -> Result<()> {
    if value > 1 {
        return Err(PriceError::invalid_input(
            field_name,
            format!("flag must be 0 or 1, got {}", value),
        ));
    }
    Ok(())
}

pub fn validate_non_negative_real(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PriceError::invalid_input(
            field_name,
            "value must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(PriceError::invalid_input(
            field_name,
            format!("value must be non-negative, got {}", value),
        ));
    }
    Ok(())
}
