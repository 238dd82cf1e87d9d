//! Single-page PDF receipts for successful transactions.
//!
//! The document is written directly as PDF 1.4: one US-Letter page, the two
//! standard Type1 fonts Helvetica and Helvetica-Oblique, and an uncompressed
//! content stream. Layout is fixed; only the text lines come from the
//! transaction.

use std::fmt::Write as _;

use crate::error::MockPayError;
use crate::types::Transaction;

/// MIME type of a rendered receipt.
pub const RECEIPT_CONTENT_TYPE: &str = "application/pdf";

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const LEFT_MARGIN: i32 = 72;
const TOP_LINE: i32 = 750;

const TITLE: &str = "Mock Payment Receipt";
const DISCLAIMER: &str = "This is a mock gateway receipt for demo/testing only.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Oblique,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Oblique => "F2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    font: Font,
    size: u32,
    y: i32,
    text: String,
}

/// Receipt text lines, top to bottom.
pub fn receipt_lines(txn: &Transaction) -> Vec<String> {
    layout(txn).into_iter().map(|line| line.text).collect()
}

/// Render the receipt for a successful transaction.
pub fn render(txn: &Transaction) -> Result<Vec<u8>, MockPayError> {
    if !txn.is_success() {
        return Err(MockPayError::ReceiptUnavailable(format!(
            "transaction for session {} has status {}",
            txn.session_id, txn.status
        )));
    }

    let content = content_stream(&layout(txn));
    Ok(write_document(&content))
}

fn layout(txn: &Transaction) -> Vec<Line> {
    let email = txn
        .request_data
        .billing_email
        .as_deref()
        .filter(|e| !e.is_empty())
        .unwrap_or("-");
    let last4 = Some(txn.request_data.card_last4.as_str())
        .filter(|l| !l.is_empty())
        .unwrap_or("****");

    let mut y = TOP_LINE;
    let mut lines = Vec::with_capacity(7);
    let mut push = |font: Font, size: u32, y: i32, text: String| {
        lines.push(Line {
            font,
            size,
            y,
            text,
        })
    };

    push(Font::Regular, 12, y, TITLE.to_string());
    y -= 24;
    push(
        Font::Regular,
        12,
        y,
        format!(
            "Transaction ID: {}",
            txn.transaction_id.as_deref().unwrap_or("-")
        ),
    );
    y -= 18;
    push(
        Font::Regular,
        12,
        y,
        // Debug keeps one decimal on whole amounts: `499.0`, `12.5`.
        format!("Amount: {:?} {}", txn.amount, txn.currency),
    );
    y -= 18;
    push(Font::Regular, 12, y, format!("Date: {}", txn.timestamp));
    y -= 18;
    push(Font::Regular, 12, y, format!("Billing Email: {email}"));
    y -= 18;
    push(Font::Regular, 12, y, format!("Card: **** **** **** {last4}"));
    y -= 36;
    push(Font::Oblique, 10, y, DISCLAIMER.to_string());

    lines
}

fn content_stream(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        // Infallible for String.
        let _ = writeln!(
            out,
            "BT /{} {} Tf {} {} Td ({}) Tj ET",
            line.font.resource(),
            line.size,
            LEFT_MARGIN,
            line.y,
            escape_text(&line.text)
        );
    }
    out
}

/// Escape a PDF literal string. Characters outside printable ASCII become `?`
/// since the standard fonts are used without embedding.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn write_document(content: &str) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Oblique /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
    ];

    let mut buf: Vec<u8> = Vec::with_capacity(1024 + content.len());
    buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(buf.len());
        buf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", idx + 1, body).as_bytes());
    }

    let xref_offset = buf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = writeln!(xref, "{offset:010} 00000 n ");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    buf.extend_from_slice(xref.as_bytes());
    buf
}
