//! CSV and PDF exports of the filtered contact list.
//!
//! Exports cover every record matching the current search and status filter,
//! regardless of the page being shown. Only one export runs at a time.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::contact::ContactRecord;
use crate::pdf::TableReport;
use crate::services::view::{ViewState, filter_contacts};
use crate::services::{ServiceError, ServiceResult};

pub const CSV_FILE_NAME: &str = "contact-management-report.csv";
pub const PDF_FILE_NAME: &str = "contact-management-report.pdf";
pub const EXPORT_FAILED: &str = "Failed to export";
pub const REPORT_TITLE: &str = "Contact Management Report";

pub const CSV_HEADERS: [&str; 9] = [
    "Name",
    "Email",
    "Mobile",
    "Subject",
    "Message",
    "Status",
    "Priority",
    "Admin Notes",
    "Date Created",
];

const PDF_COLUMNS: [(&str, f32); 7] = [
    ("Name", 110.0),
    ("Email", 160.0),
    ("Mobile", 90.0),
    ("Subject", 180.0),
    ("Status", 70.0),
    ("Priority", 70.0),
    ("Date", 82.0),
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No contacts to export")]
    Empty,

    #[error("An export is already running")]
    Busy,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for ServiceError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Empty => ServiceError::Export(err.to_string()),
            ExportError::Busy => ServiceError::Conflict(err.to_string()),
            ExportError::Csv(_) | ExportError::Io(_) => {
                log::error!("Failed to export contacts: {err}");
                ServiceError::Export(EXPORT_FAILED.to_string())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_FILE_NAME,
            ExportFormat::Pdf => PDF_FILE_NAME,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// A finished export ready to be offered as a download.
#[derive(Debug)]
pub struct ExportFile {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// Admits a single export at a time.
#[derive(Debug, Default)]
pub struct ExportLock {
    busy: AtomicBool,
}

impl ExportLock {
    pub fn try_acquire(&self) -> Option<ExportGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard(self))
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

pub struct ExportGuard<'a>(&'a ExportLock);

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::Release);
    }
}

fn date_created(record: &ContactRecord) -> String {
    record.created_at.format("%Y-%m-%d").to_string()
}

/// Serializes contacts with every field quoted and embedded quotes doubled.
pub fn contacts_to_csv(records: &[&ContactRecord]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADERS)?;

    for record in records {
        let created = date_created(record);
        wtr.write_record([
            record.name.as_str(),
            record.email.as_str(),
            record.mobile.as_deref().unwrap_or(""),
            record.subject.as_str(),
            record.message.as_str(),
            record.status.as_str(),
            record.priority.as_str(),
            record.admin_notes.as_deref().unwrap_or(""),
            created.as_str(),
        ])?;
    }

    wtr.into_inner().map_err(|err| ExportError::Io(err.into_error()))
}

/// Renders the printable report. Message and admin notes are left out.
pub fn contacts_to_pdf(records: &[&ContactRecord], generated_at: DateTime<Utc>) -> Vec<u8> {
    let subtitle = format!(
        "Generated on: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let rows = records
        .iter()
        .map(|record| {
            vec![
                record.name.clone(),
                record.email.clone(),
                record.mobile.clone().unwrap_or_default(),
                record.subject.clone(),
                record.status.badge().label.to_string(),
                record.priority.badge().label.to_string(),
                date_created(record),
            ]
        })
        .collect();

    TableReport {
        title: REPORT_TITLE,
        subtitle: &subtitle,
        columns: &PDF_COLUMNS,
        rows,
    }
    .render()
}

/// Exports every record matching `state`, ignoring its page.
pub fn export_contacts(
    lock: &ExportLock,
    records: &[ContactRecord],
    state: &ViewState,
    format: ExportFormat,
) -> ServiceResult<ExportFile> {
    let _guard = lock.try_acquire().ok_or(ExportError::Busy)?;

    let filtered = filter_contacts(records, state);
    if filtered.is_empty() {
        return Err(ExportError::Empty.into());
    }

    let bytes = match format {
        ExportFormat::Csv => contacts_to_csv(&filtered)?,
        ExportFormat::Pdf => contacts_to_pdf(&filtered, Utc::now()),
    };

    log::info!("Exported {} contacts as {:?}", filtered.len(), format);
    Ok(ExportFile { format, bytes })
}
