pub const APP_NAME: &str = "Paving Estimator";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

/// Release tag when built from a tagged checkout, otherwise the crate version.
pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// Footer line printed on generated quotes.
pub fn generator_line() -> String {
    format!("Generated by {} {}", APP_NAME, version_label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_never_empty() {
        assert!(version_label().len() > 1);
        assert!(generator_line().starts_with("Generated by Paving Estimator"));
    }
}
