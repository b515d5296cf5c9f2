use futures::future::try_join_all;
use serde_json::Value;

use crate::drivers::{PageDriver, PageError, js_string};
use crate::report::CheckError;

/// What a freshly generated html scaffold leaves in `<title>`.
const PLACEHOLDER_TITLE: &str = "Document";

/// Computed value both margin and padding must resolve to.
const RESET_VALUE: &str = "0px";

/// Required semantic tags, probed concurrently; the absentees reduce into a
/// single comma-joined error.
pub async fn check_semantic_tags<D: PageDriver>(
    driver: &D,
    page: &D::Page,
    tags: &[String],
) -> Result<Vec<CheckError>, PageError> {
    let probes = tags.iter().map(|tag| driver.exists(page, tag));
    let present = try_join_all(probes).await?;

    let missing: Vec<&str> = tags
        .iter()
        .zip(present)
        .filter(|(_, found)| !found)
        .map(|(tag, _)| tag.as_str())
        .collect();

    if missing.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![CheckError::SemanticTagsMissing {
            tags: missing.join(", "),
        }])
    }
}

/// The `<html>` element must carry the expected language attribute.
pub async fn check_lang<D: PageDriver>(
    driver: &D,
    page: &D::Page,
    lang: &str,
) -> Result<Vec<CheckError>, PageError> {
    let selector = format!("html[lang*={lang}]");
    if driver.exists(page, &selector).await? {
        Ok(Vec::new())
    } else {
        Ok(vec![CheckError::LangAttrMissing {
            lang: lang.to_string(),
        }])
    }
}

/// The title must be changed from the scaffold placeholder.
pub async fn check_title<D: PageDriver>(
    driver: &D,
    page: &D::Page,
) -> Result<Vec<CheckError>, PageError> {
    let title = driver.evaluate(page, "document.title").await?;
    if title == Value::String(PLACEHOLDER_TITLE.to_string()) {
        Ok(vec![CheckError::TitleEmmet])
    } else {
        Ok(Vec::new())
    }
}

/// The font stylesheet link must come before the main stylesheet link so
/// font face definitions are available when the main sheet is applied.
pub async fn check_load_order<D: PageDriver>(
    driver: &D,
    page: &D::Page,
    fonts_css: &str,
    main_css: &str,
) -> Result<Vec<CheckError>, PageError> {
    let expr = format!(
        "(() => {{ const hrefs = Array.from(document.querySelectorAll('head link[rel=stylesheet]'))\
         .map((l) => l.getAttribute('href') || ''); \
         const fonts = hrefs.findIndex((h) => h.includes({fonts})); \
         const main = hrefs.findIndex((h) => h.includes({main})); \
         return fonts !== -1 && main !== -1 && fonts < main; }})()",
        fonts = js_string(fonts_css),
        main = js_string(main_css),
    );

    if driver.evaluate(page, &expr).await? == Value::Bool(true) {
        Ok(Vec::new())
    } else {
        Ok(vec![CheckError::OrderStylesheetLinks])
    }
}

/// Margin and padding must be reset to zero for each configured tag; the
/// offenders reduce into a single comma-joined error.
pub async fn check_reset_margins<D: PageDriver>(
    driver: &D,
    page: &D::Page,
    tags: &[String],
) -> Result<Vec<CheckError>, PageError> {
    let probes = tags
        .iter()
        .map(|tag| driver.computed_style(page, tag, &["margin", "padding"]));
    let styles = try_join_all(probes).await?;

    let offenders: Vec<&str> = tags
        .iter()
        .zip(styles)
        .filter(|(_, values)| values.iter().any(|value| value != RESET_VALUE))
        .map(|(tag, _)| tag.as_str())
        .collect();

    if offenders.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![CheckError::NotResetMargins {
            tags: offenders.join(", "),
        }])
    }
}

/// The logo must be wrapped per the configured selector.
pub async fn check_logo<D: PageDriver>(
    driver: &D,
    page: &D::Page,
    selector: &str,
) -> Result<Vec<CheckError>, PageError> {
    if driver.exists(page, selector).await? {
        Ok(Vec::new())
    } else {
        Ok(vec![CheckError::LogoWrapper])
    }
}

/// Contact links must use the mailto:/tel: schemes.
pub async fn check_contacts<D: PageDriver>(
    driver: &D,
    page: &D::Page,
) -> Result<Vec<CheckError>, PageError> {
    let (email, phone) = futures::try_join!(
        driver.exists(page, "a[href^=\"mailto:\"]"),
        driver.exists(page, "a[href^=\"tel:\"]"),
    )?;

    if email && phone {
        Ok(Vec::new())
    } else {
        Ok(vec![CheckError::PrefixForEmailAndPhone])
    }
}
