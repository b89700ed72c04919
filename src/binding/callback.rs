// Mon Oct 12 2026 - Alex

use crate::binding::error::CallbackParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([A-Za-z_]\w*)\s*\((.*)\)\s*$").unwrap());

/// A function-pointer field paired with the field holding its user reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackDescriptor {
    /// Managed delegate type the function pointer is exposed as.
    pub identifier_type: String,
    /// Sibling field that receives the marshalled delegate reference.
    pub reference_name: String,
}

/// Parses `type(X);pfn(Y)` in either order. An empty statement is not a callback.
pub fn parse_callback(statement: &str) -> Result<Option<CallbackDescriptor>, CallbackParseError> {
    if statement.trim().is_empty() {
        return Ok(None);
    }

    let parts: Vec<&str> = statement.split(';').filter(|p| !p.trim().is_empty()).collect();
    if parts.len() != 2 {
        return Err(CallbackParseError::PartCount(parts.len()));
    }

    let mut identifier_type = None;
    let mut reference_name = None;
    for part in parts {
        let captures = PART
            .captures(part)
            .ok_or_else(|| CallbackParseError::NotInvocation(part.trim().to_string()))?;
        let function = &captures[1];
        let argument = captures[2].trim();
        if argument.is_empty() || argument.contains(',') {
            return Err(CallbackParseError::ArgumentCount(function.to_string()));
        }

        let slot = match function.to_ascii_lowercase().as_str() {
            "type" => &mut identifier_type,
            "pfn" => &mut reference_name,
            _ => return Err(CallbackParseError::UnknownFunction(function.to_string())),
        };
        if slot.is_some() {
            return Err(CallbackParseError::Duplicate(function.to_string()));
        }
        *slot = Some(argument.to_string());
    }

    match (identifier_type, reference_name) {
        (Some(identifier_type), Some(reference_name)) => Ok(Some(CallbackDescriptor {
            identifier_type,
            reference_name,
        })),
        _ => Err(CallbackParseError::PartCount(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_in_either_order() {
        let expected = CallbackDescriptor {
            identifier_type: "ReadCallback".to_string(),
            reference_name: "pfnRead".to_string(),
        };
        assert_eq!(parse_callback("type(ReadCallback);pfn(pfnRead)").unwrap(), Some(expected.clone()));
        assert_eq!(parse_callback("PFN(pfnRead); Type(ReadCallback)").unwrap(), Some(expected));
    }

    #[test]
    fn test_empty_statement_is_not_a_callback() {
        assert_eq!(parse_callback("   ").unwrap(), None);
    }

    #[test]
    fn test_rejects_malformed_statements() {
        assert_eq!(parse_callback("type(A)"), Err(CallbackParseError::PartCount(1)));
        assert_eq!(
            parse_callback("type(A);type(B)"),
            Err(CallbackParseError::Duplicate("type".to_string()))
        );
        assert_eq!(
            parse_callback("type(A);ref(B)"),
            Err(CallbackParseError::UnknownFunction("ref".to_string()))
        );
        assert!(matches!(parse_callback("type(A);pfn"), Err(CallbackParseError::NotInvocation(_))));
    }
}
