//! Department report route handlers.
//!
//! Officers file manual reports (enhanced by the model), upload PDFs to the
//! media host and request analyses. Every handler is scoped to the
//! officer's department.

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use civic_core::{Department, ReportId};

use crate::ai::{Attachment, ReportLine, format_report, prompts};
use crate::db::ReportRepository;
use crate::error::{AppError, Result, StoreContext};
use crate::media::Upload;
use crate::middleware::{Authorized, OfficerOnly};
use crate::models::{NewReport, Report, ReportSource};
use crate::models::report::{manual_report_title, pdf_report_title};
use crate::state::AppState;

use super::officer_department;

/// Largest accepted PDF.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

const PDF_MIME: &str = "application/pdf";

/// A report with its body split into display lines.
#[derive(Debug, Serialize)]
pub struct ReportView {
    #[serde(flatten)]
    pub report: Report,
    pub formatted: Vec<ReportLine>,
}

impl From<Report> for ReportView {
    fn from(report: Report) -> Self {
        let formatted = format_report(&report.content);
        Self { report, formatted }
    }
}

/// Body of `POST /api/officer/reports/manual`.
#[derive(Debug, Deserialize)]
pub struct ManualReportForm {
    #[serde(default)]
    pub text: String,
}

/// Analyses available for a single report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    ActionItems,
    RiskAssessment,
    Performance,
}

/// Body of `POST /api/officer/reports/{id}/analysis`.
#[derive(Debug, Deserialize)]
pub struct AnalysisForm {
    pub kind: AnalysisKind,
    /// Extra context for performance analytics.
    pub history: Option<String>,
}

/// Generated analysis text.
#[derive(Debug, Serialize)]
pub struct Analysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnalysisKind>,
    pub report_count: usize,
    pub text: String,
    pub formatted: Vec<ReportLine>,
}

impl Analysis {
    fn new(kind: Option<AnalysisKind>, report_count: usize, text: String) -> Self {
        let formatted = format_report(&text);
        Self {
            kind,
            report_count,
            text,
            formatted,
        }
    }
}

/// Check the type and size of an uploaded file.
fn validate_pdf(content_type: Option<&str>, size: usize) -> Result<()> {
    if content_type != Some(PDF_MIME) {
        return Err(AppError::BadRequest("Please upload a PDF file only.".to_owned()));
    }
    if size > MAX_PDF_BYTES {
        return Err(AppError::BadRequest(
            "File size must be less than 10MB.".to_owned(),
        ));
    }
    Ok(())
}

fn multipart_error(err: &MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}

async fn find_report(state: &AppState, department: Department, id: ReportId) -> Result<Report> {
    ReportRepository::new(state.pool())
        .get_in_department(id, department)
        .await
        .context("load report")?
        .ok_or_else(|| AppError::NotFound("Report not found.".to_owned()))
}

/// `GET /api/officer/reports`
pub async fn list(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReportView>>> {
    let department = officer_department(&state, &user).await?;
    let reports = ReportRepository::new(state.pool())
        .list_by_department(department)
        .await
        .context("load reports")?;
    Ok(Json(reports.into_iter().map(ReportView::from).collect()))
}

/// `POST /api/officer/reports/manual`
#[tracing::instrument(skip_all, fields(officer = %user.email))]
pub async fn create_manual(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<ManualReportForm>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(form) = payload?;
    let department = officer_department(&state, &user).await?;

    let text = form.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest(
            "Please enter report content.".to_owned(),
        ));
    }

    let enhanced = state
        .gemini()
        .generate(&prompts::enhance_report(department, text), None)
        .await?;

    let report = ReportRepository::new(state.pool())
        .create(&NewReport {
            department,
            title: manual_report_title(Utc::now()),
            content: enhanced,
            uploaded_by: user.email.clone(),
            source: ReportSource::Manual {
                original_text: text.to_owned(),
            },
        })
        .await
        .context("save report")?;

    tracing::info!(report_id = %report.id, "Manual report stored");

    Ok((StatusCode::CREATED, Json(ReportView::from(report))))
}

/// `POST /api/officer/reports/pdf` (multipart: `file`, optional `summarize`)
#[tracing::instrument(skip_all, fields(officer = %user.email))]
pub async fn upload_pdf(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let department = officer_department(&state, &user).await?;

    let mut file = None;
    let mut summarize = false;
    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(&e))? {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("report.pdf").to_owned();
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await.map_err(|e| multipart_error(&e))?;
                file = Some((file_name, content_type, data));
            }
            Some("summarize") => {
                let value = field.text().await.map_err(|e| multipart_error(&e))?;
                summarize = matches!(value.trim(), "true" | "1" | "on");
            }
            _ => {}
        }
    }

    let Some((file_name, content_type, data)) = file else {
        return Err(AppError::BadRequest(
            "Please select a file to upload.".to_owned(),
        ));
    };
    validate_pdf(content_type.as_deref(), data.len())?;

    let content = if summarize {
        state
            .gemini()
            .generate(
                &prompts::summarize_document(department, &file_name),
                Some(Attachment {
                    mime_type: PDF_MIME,
                    data: &data,
                }),
            )
            .await?
    } else {
        String::new()
    };

    let media = state
        .media()
        .upload_raw(Upload {
            file_name: &file_name,
            content_type: PDF_MIME,
            data: &data,
            department,
            uploaded_by: &user.email,
        })
        .await?;

    let file_size = i64::try_from(data.len()).unwrap_or(i64::MAX);
    let report = ReportRepository::new(state.pool())
        .create(&NewReport {
            department,
            title: pdf_report_title(&file_name),
            content,
            uploaded_by: user.email.clone(),
            source: ReportSource::Pdf {
                file_name,
                file_size,
                media,
            },
        })
        .await
        .context("save report")?;

    tracing::info!(report_id = %report.id, summarized = summarize, "PDF report stored");

    Ok((StatusCode::CREATED, Json(ReportView::from(report))))
}

/// `GET /api/officer/reports/{id}/download`
pub async fn download(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
    Path(id): Path<ReportId>,
) -> Result<Redirect> {
    let department = officer_department(&state, &user).await?;
    let report = find_report(&state, department, id).await?;

    match &report.source {
        ReportSource::Pdf {
            file_name, media, ..
        } => Ok(Redirect::to(
            &state.media().download_url(&media.public_id, file_name),
        )),
        ReportSource::Manual { .. } => Err(AppError::BadRequest(
            "This report has no file attached.".to_owned(),
        )),
    }
}

/// `GET /api/officer/reports/{id}/view`
pub async fn view(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
    Path(id): Path<ReportId>,
) -> Result<Redirect> {
    let department = officer_department(&state, &user).await?;
    let report = find_report(&state, department, id).await?;

    report
        .media()
        .map(|media| Redirect::to(&media.secure_url))
        .ok_or_else(|| AppError::BadRequest("This report has no file attached.".to_owned()))
}

/// `POST /api/officer/reports/{id}/analysis`
#[tracing::instrument(skip_all, fields(report_id = %id, kind = tracing::field::Empty))]
pub async fn analyze(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
    Path(id): Path<ReportId>,
    payload: std::result::Result<Json<AnalysisForm>, JsonRejection>,
) -> Result<Json<Analysis>> {
    let Json(form) = payload?;
    tracing::Span::current().record("kind", tracing::field::debug(&form.kind));
    let department = officer_department(&state, &user).await?;
    let report = find_report(&state, department, id).await?;

    if report.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "This report has no content to analyze.".to_owned(),
        ));
    }

    let prompt = match form.kind {
        AnalysisKind::ActionItems => prompts::action_items(department, &report.content),
        AnalysisKind::RiskAssessment => prompts::risk_assessment(department, &report.content),
        AnalysisKind::Performance => {
            prompts::performance_analytics(department, &report.content, form.history.as_deref())
        }
    };

    let text = state.gemini().generate(&prompt, None).await?;
    Ok(Json(Analysis::new(Some(form.kind), 1, text)))
}

/// `POST /api/officer/reports/compare`
pub async fn compare(
    Authorized(user, ..): Authorized<OfficerOnly>,
    State(state): State<AppState>,
) -> Result<Json<Analysis>> {
    let department = officer_department(&state, &user).await?;
    let reports = ReportRepository::new(state.pool())
        .list_by_department(department)
        .await
        .context("load reports")?;

    let contents: Vec<&str> = reports
        .iter()
        .map(|r| r.content.as_str())
        .filter(|c| !c.trim().is_empty())
        .collect();
    if contents.len() < 2 {
        return Err(AppError::BadRequest(
            "At least two reports with content are needed for a comparison.".to_owned(),
        ));
    }

    let text = state
        .gemini()
        .generate(&prompts::comparative_analysis(department, &contents), None)
        .await?;
    Ok(Json(Analysis::new(None, contents.len(), text)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pdf_type() {
        let err = validate_pdf(Some("image/png"), 10).unwrap_err();
        assert_eq!(err.to_string(), "Please upload a PDF file only.");
        assert!(validate_pdf(None, 10).is_err());
    }

    #[test]
    fn test_validate_pdf_size() {
        assert!(validate_pdf(Some(PDF_MIME), MAX_PDF_BYTES).is_ok());
        let err = validate_pdf(Some(PDF_MIME), MAX_PDF_BYTES + 1).unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 10MB.");
    }

    #[test]
    fn test_analysis_kind_wire_names() {
        let form: AnalysisForm =
            serde_json::from_str(r#"{"kind":"risk_assessment"}"#).unwrap();
        assert_eq!(form.kind, AnalysisKind::RiskAssessment);
        assert!(form.history.is_none());
    }

    #[test]
    fn test_analysis_formats_text() {
        let analysis = Analysis::new(None, 2, "## KEY INSIGHTS\nBudget: ok".to_owned());
        assert_eq!(analysis.formatted.len(), 2);
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("kind").is_none());
        assert_eq!(json["report_count"], 2);
    }
}
