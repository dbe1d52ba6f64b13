//! PDF export. Documents are rendered to a self-contained HTML page and
//! piped through the `wkhtmltopdf` binary. The renderer returns `None` on
//! any failure and callers surface that as a rendering error, never as an
//! empty success.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{error, instrument, warn};

use crate::config::CompanyConfig;
use crate::entities::client;
use crate::errors::ServiceError;
use crate::services::delivery_notes::DeliveryNoteDetail;
use crate::services::invoices::InvoiceDetail;
use crate::services::proformas::ProformaDetail;

/// Turns an HTML page into PDF bytes. `None` means the render failed.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Option<Vec<u8>>;
}

/// Production renderer shelling out to wkhtmltopdf.
pub struct WkhtmltopdfRenderer {
    binary: String,
}

impl WkhtmltopdfRenderer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for WkhtmltopdfRenderer {
    async fn render(&self, html: &str) -> Option<Vec<u8>> {
        let mut child = match Command::new(&self.binary)
            .args(["--quiet", "--encoding", "utf-8", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                error!(binary = %self.binary, error = %err, "failed to spawn pdf renderer");
                return None;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(html.as_bytes()).await {
                warn!(error = %err, "failed writing html to pdf renderer");
                return None;
            }
        }

        match child.wait_with_output().await {
            Ok(output) if output.status.success() && !output.stdout.is_empty() => {
                Some(output.stdout)
            }
            Ok(output) => {
                warn!(
                    status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "pdf renderer exited without output"
                );
                None
            }
            Err(err) => {
                error!(error = %err, "pdf renderer failed");
                None
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Group the integer digits by thousands with spaces; keep a fractional
/// part only when there is one.
fn format_amount(amount: Decimal) -> String {
    let normalized = amount.normalize();
    let text = normalized.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

fn page_header(company: &CompanyConfig, title: &str, number: &str) -> String {
    let mut contact = Vec::new();
    if !company.address.is_empty() {
        contact.push(escape(&company.address));
    }
    if !company.phone.is_empty() {
        let mut phones = escape(&company.phone);
        if !company.phone2.is_empty() {
            phones.push_str(" / ");
            phones.push_str(&escape(&company.phone2));
        }
        contact.push(format!("Tel: {phones}"));
    }
    if !company.email.is_empty() {
        contact.push(escape(&company.email));
    }
    if !company.tax_id.is_empty() {
        contact.push(format!("NINEA: {}", escape(&company.tax_id)));
    }
    if !company.registration_number.is_empty() {
        contact.push(format!("RCCM: {}", escape(&company.registration_number)));
    }

    format!(
        "<div class=\"header\">\
         <h1>{}</h1>\
         <p class=\"slogan\">{}</p>\
         <p class=\"contact\">{}</p>\
         </div>\
         <h2>{} {}</h2>",
        escape(&company.name),
        escape(&company.slogan),
        contact.join(" &middot; "),
        escape(title),
        escape(number)
    )
}

fn client_block(client: &client::Model) -> String {
    let mut lines = vec![format!("<strong>{}</strong>", escape(&client.name))];
    if let Some(address) = client.address.as_deref().filter(|s| !s.is_empty()) {
        lines.push(escape(address));
    }
    if let Some(phone) = client.phone.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("Tel: {}", escape(phone)));
    }
    if let Some(tax_id) = client.tax_id.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("NINEA: {}", escape(tax_id)));
    }
    format!("<div class=\"client\">{}</div>", lines.join("<br>"))
}

const PAGE_STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;font-size:12px;color:#222}\
 .header h1{margin:0}.slogan{font-style:italic;margin:2px 0}.contact{margin:2px 0;color:#555}\
 h2{border-bottom:2px solid #222;padding-bottom:4px}\
 .client{margin:12px 0;padding:8px;border:1px solid #ccc}\
 table{width:100%;border-collapse:collapse;margin-top:12px}\
 th,td{border:1px solid #999;padding:6px;text-align:left}\
 th{background:#eee}td.num,th.num{text-align:right}\
 .totals{margin-top:12px;width:40%;margin-left:60%}\
 .notes{margin-top:16px;white-space:pre-wrap}";

fn html_page(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <style>{PAGE_STYLE}</style></head><body>{body}</body></html>"
    )
}

fn priced_items_table(
    currency: &str,
    rows: impl Iterator<Item = (String, Decimal, Decimal, Decimal, Decimal)>,
) -> String {
    let mut table = String::from(
        "<table><thead><tr><th>Description</th><th class=\"num\">Qty</th>\
         <th class=\"num\">Unit price</th><th class=\"num\">VAT %</th>\
         <th class=\"num\">Total</th></tr></thead><tbody>",
    );
    for (description, quantity, unit_price, tax_rate, total) in rows {
        table.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{} {}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{} {}</td></tr>",
            escape(&description),
            format_amount(quantity),
            format_amount(unit_price),
            escape(currency),
            format_amount(tax_rate),
            format_amount(total),
            escape(currency),
        ));
    }
    table.push_str("</tbody></table>");
    table
}

fn totals_block(
    currency: &str,
    before_tax: Decimal,
    tax: Decimal,
    with_tax: Decimal,
) -> String {
    format!(
        "<table class=\"totals\">\
         <tr><td>Total excl. VAT</td><td class=\"num\">{} {}</td></tr>\
         <tr><td>VAT</td><td class=\"num\">{} {}</td></tr>\
         <tr><td><strong>Total incl. VAT</strong></td><td class=\"num\"><strong>{} {}</strong></td></tr>\
         </table>",
        format_amount(before_tax),
        escape(currency),
        format_amount(tax),
        escape(currency),
        format_amount(with_tax),
        escape(currency),
    )
}

fn notes_block(notes: Option<&str>) -> String {
    match notes.filter(|n| !n.is_empty()) {
        Some(text) => format!("<div class=\"notes\">{}</div>", escape(text)),
        None => String::new(),
    }
}

pub fn build_invoice_html(company: &CompanyConfig, detail: &InvoiceDetail) -> String {
    let currency = company.currency.as_str();
    let mut body = page_header(company, "INVOICE", &detail.invoice.number);
    body.push_str(&format!(
        "<p>Date: {} &middot; Status: {}</p>",
        detail.invoice.date,
        detail.invoice.status.as_str()
    ));
    if let Some(due) = detail.invoice.due_date {
        body.push_str(&format!("<p>Due date: {due}</p>"));
    }
    body.push_str(&client_block(&detail.client));
    body.push_str(&priced_items_table(
        currency,
        detail.items.iter().map(|i| {
            (
                i.description.clone(),
                i.quantity,
                i.unit_price,
                i.tax_rate,
                i.total_with_tax,
            )
        }),
    ));
    body.push_str(&totals_block(
        currency,
        detail.invoice.total_before_tax,
        detail.invoice.total_tax,
        detail.invoice.total_with_tax,
    ));
    body.push_str(&notes_block(detail.invoice.notes.as_deref()));
    html_page(&body)
}

pub fn build_proforma_html(company: &CompanyConfig, detail: &ProformaDetail) -> String {
    let currency = company.currency.as_str();
    let mut body = page_header(company, "PROFORMA", &detail.proforma.number);
    body.push_str(&format!(
        "<p>Date: {} &middot; Status: {}</p>",
        detail.proforma.date,
        detail.proforma.status.as_str()
    ));
    if let Some(validity) = detail.proforma.validity_date {
        body.push_str(&format!("<p>Valid until: {validity}</p>"));
    }
    body.push_str(&client_block(&detail.client));
    body.push_str(&priced_items_table(
        currency,
        detail.items.iter().map(|i| {
            (
                i.description.clone(),
                i.quantity,
                i.unit_price,
                i.tax_rate,
                i.total_with_tax,
            )
        }),
    ));
    body.push_str(&totals_block(
        currency,
        detail.proforma.total_before_tax,
        detail.proforma.total_tax,
        detail.proforma.total_with_tax,
    ));
    body.push_str(&notes_block(detail.proforma.notes.as_deref()));
    html_page(&body)
}

pub fn build_delivery_note_html(company: &CompanyConfig, detail: &DeliveryNoteDetail) -> String {
    let mut body = page_header(company, "DELIVERY NOTE", &detail.delivery_note.number);
    body.push_str(&format!("<p>Date: {}</p>", detail.delivery_note.date));
    if let Some(method) = detail.delivery_note.payment_method {
        body.push_str(&format!("<p>Payment: {}</p>", method.as_str()));
    }
    if let Some(by) = detail
        .delivery_note
        .delivered_by
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        body.push_str(&format!("<p>Delivered by: {}</p>", escape(by)));
    }
    body.push_str(&client_block(&detail.client));

    body.push_str(
        "<table><thead><tr><th>Description</th><th class=\"num\">Qty</th>\
         <th>Observation</th></tr></thead><tbody>",
    );
    for item in &detail.items {
        body.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td>{}</td></tr>",
            escape(&item.description),
            format_amount(item.quantity),
            escape(item.observation.as_deref().unwrap_or("")),
        ));
    }
    body.push_str("</tbody></table>");
    body.push_str(&notes_block(detail.delivery_note.notes.as_deref()));
    html_page(&body)
}

/// Renders loaded documents with the company identity block.
#[derive(Clone)]
pub struct DocumentPdfService {
    renderer: Arc<dyn PdfRenderer>,
    company: CompanyConfig,
}

impl DocumentPdfService {
    pub fn new(renderer: Arc<dyn PdfRenderer>, company: CompanyConfig) -> Self {
        Self { renderer, company }
    }

    async fn render(&self, number: &str, html: String) -> Result<Vec<u8>, ServiceError> {
        self.renderer.render(&html).await.ok_or_else(|| {
            ServiceError::RenderFailed(format!("Could not render document {number}"))
        })
    }

    #[instrument(skip(self, detail), fields(number = %detail.invoice.number))]
    pub async fn invoice_pdf(&self, detail: &InvoiceDetail) -> Result<Vec<u8>, ServiceError> {
        let html = build_invoice_html(&self.company, detail);
        self.render(&detail.invoice.number, html).await
    }

    #[instrument(skip(self, detail), fields(number = %detail.proforma.number))]
    pub async fn proforma_pdf(&self, detail: &ProformaDetail) -> Result<Vec<u8>, ServiceError> {
        let html = build_proforma_html(&self.company, detail);
        self.render(&detail.proforma.number, html).await
    }

    #[instrument(skip(self, detail), fields(number = %detail.delivery_note.number))]
    pub async fn delivery_note_pdf(
        &self,
        detail: &DeliveryNoteDetail,
    ) -> Result<Vec<u8>, ServiceError> {
        let html = build_delivery_note_html(&self.company, detail);
        self.render(&detail.delivery_note.number, html).await
    }
}
