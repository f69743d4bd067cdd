use crate::Messages;
use crate::data::currency::format_amount;
use crate::data::{
    DEFAULT_COUNTRY, InvoiceData, InvoiceHeader, InvoiceTotals, ItemKind, LineItem, Member,
    ProjectContext, ProjectType,
};
use crate::util::{escape_html, format_date_long, format_date_short};

use branding::{
    ADHOC_BANK_DETAILS, ADHOC_DUE_DATE_NOTICE, ADHOC_NOTICE_LABEL, ADHOC_PAYMENT_REFERENCE_NOTICE,
    BRAND_NAME, EMAIL, PHONE, PRIMARY_COLOR, PROJECT_BANK_DETAILS, PROJECT_DUE_DATE_NOTICE,
    PROJECT_NOTICE_LABEL, PROJECT_PAYMENT_REFERENCE_NOTICE, SECONDARY_COLOR, TAGLINE, WEBSITE,
};

pub(crate) mod branding;

const BLANK: &str = "________________";
const BORDER: &str = "1px solid #d1d5db";
const TEXT_COLOR: &str = "#374151";
const HEADING_COLOR: &str = "#1f2937";
const MUTED_COLOR: &str = "#6b7280";
const FILL_COLOR: &str = "#f3f4f6";
const DASHED: &str = "border-bottom: 1px dashed #9ca3af;";

// The ad-hoc invoice keeps the plain letterhead look, project invoices get
// the banded header and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    AdHoc,
    Project,
}

impl Layout {
    fn of(data: &InvoiceData) -> Self {
        match data {
            InvoiceData::AdHoc(_) => Layout::AdHoc,
            InvoiceData::Project(_) => Layout::Project,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Layout::AdHoc => BLANK,
            Layout::Project => "",
        }
    }

    fn item_date(&self, raw: &str) -> String {
        match self {
            Layout::AdHoc => format_date_short(raw),
            Layout::Project => format_date_long(raw),
        }
    }

    fn missing_taxes(&self) -> &'static str {
        match self {
            Layout::AdHoc => "",
            Layout::Project => Messages::NotApplicable.msg(),
        }
    }

    fn cell(&self) -> &'static str {
        match self {
            Layout::AdHoc => "border: 1px solid #d1d5db; padding: 10px;",
            Layout::Project => {
                "border: 1px solid #d1d5db; padding: 10px 12px; font-size: 12px; color: #374151;"
            }
        }
    }

    fn section_margin(&self) -> &'static str {
        match self {
            Layout::AdHoc => "margin-bottom: 30px;",
            Layout::Project => "margin: 0 30px 25px 30px;",
        }
    }

    fn due_date_notice(&self) -> &'static str {
        match self {
            Layout::AdHoc => ADHOC_DUE_DATE_NOTICE,
            Layout::Project => PROJECT_DUE_DATE_NOTICE,
        }
    }

    fn bank_details(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Layout::AdHoc => &ADHOC_BANK_DETAILS,
            Layout::Project => &PROJECT_BANK_DETAILS,
        }
    }

    fn payment_reference_notice(&self) -> (&'static str, &'static str) {
        match self {
            Layout::AdHoc => (ADHOC_NOTICE_LABEL, ADHOC_PAYMENT_REFERENCE_NOTICE),
            Layout::Project => (PROJECT_NOTICE_LABEL, PROJECT_PAYMENT_REFERENCE_NOTICE),
        }
    }

    // project items without a kind are milestones
    fn item_kind(&self, kind: Option<ItemKind>) -> Option<ItemKind> {
        match self {
            Layout::AdHoc => None,
            Layout::Project => Some(kind.unwrap_or(ItemKind::Milestone)),
        }
    }
}

/// Builds the self-contained, inline-styled markup of an invoice.
pub(crate) fn build_markup(data: &InvoiceData) -> String {
    let layout = Layout::of(data);
    let header = data.header();
    let currency = escape_html(header.currency());
    let mut out = String::with_capacity(16 * 1024);

    out.push_str(match layout {
        Layout::AdHoc => {
            r#"<div style="position: relative; width: 100%; background: white; padding: 20mm; box-sizing: border-box; font-family: Arial, sans-serif;">"#
        }
        Layout::Project => {
            r#"<div style="position: relative; width: 100%; background: white; padding: 0; margin: 0; box-sizing: border-box; font-family: Arial, sans-serif;">"#
        }
    });
    out.push('\n');

    if layout == Layout::AdHoc {
        render_watermark(&mut out);
    }
    render_header(&mut out, layout);
    render_title(&mut out, layout);
    if let Some(project) = data.project() {
        render_project_badge(&mut out, project);
    }
    render_metadata(&mut out, header, data.project(), layout);
    render_items(&mut out, data.items(), layout, &currency);
    render_summary(&mut out, data.totals(), layout, &currency);
    render_post(&mut out, layout);
    if layout == Layout::Project {
        render_footer(&mut out);
    }

    out.push_str("</div>\n");
    out
}

fn text_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_owned()
    } else {
        escape_html(value.trim())
    }
}

fn render_watermark(out: &mut String) {
    out.push_str(&format!(
        r#"<div style="position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%) rotate(-45deg); opacity: 0.05; font-size: 120px; font-weight: bold; color: {PRIMARY_COLOR}; z-index: 0;">{BRAND_NAME}</div>
"#
    ));
}

fn render_header(out: &mut String, layout: Layout) {
    match layout {
        Layout::AdHoc => out.push_str(&format!(
            r#"<div style="display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 30px; position: relative; z-index: 1;">
  <div>
    <div style="font-size: 36px; font-weight: bold; color: {PRIMARY_COLOR}; margin-bottom: 5px;">{BRAND_NAME}</div>
    <div style="color: {MUTED_COLOR}; font-size: 14px; margin-top: 5px;">{TAGLINE}</div>
  </div>
  <div style="text-align: right; font-size: 12px; color: {TEXT_COLOR};">
    <div style="margin-bottom: 5px;">{WEBSITE}</div>
    <div style="margin-bottom: 5px;">{EMAIL}</div>
    <div>{PHONE}</div>
  </div>
</div>
"#
        )),
        Layout::Project => out.push_str(&format!(
            r#"<div style="background: linear-gradient(to right, {PRIMARY_COLOR}, {SECONDARY_COLOR}); padding: 25px 30px;">
  <div style="display: flex; justify-content: space-between; align-items: flex-start;">
    <div>
      <div style="font-size: 42px; font-weight: bold; color: white; margin-bottom: 5px; letter-spacing: 1px;">{BRAND_NAME}</div>
      <div style="color: rgba(255, 255, 255, 0.95); font-size: 13px; margin-top: 3px; font-style: italic;">{TAGLINE}</div>
    </div>
    <div style="text-align: right; font-size: 11px; color: white; line-height: 1.8;">
      <div>{WEBSITE}</div>
      <div>{EMAIL}</div>
      <div>{PHONE}</div>
    </div>
  </div>
</div>
"#
        )),
    }
}

fn render_title(out: &mut String, layout: Layout) {
    let style = match layout {
        Layout::AdHoc => "font-size: 24px; margin-bottom: 30px; position: relative; z-index: 1;",
        Layout::Project => "font-size: 22px; margin: 25px 0; color: #1f2937; letter-spacing: 1px;",
    };
    out.push_str(&format!(
        r#"<div style="text-align: center; font-weight: bold; {style}">{}</div>
"#,
        Messages::PaymentInvoice.msg()
    ));
}

fn render_project_badge(out: &mut String, project: &ProjectContext) {
    let (background, color) = match project.project_type {
        ProjectType::FinalYear => ("#dbeafe", "#1e40af"),
        ProjectType::Industry => ("#d1fae5", "#047857"),
    };
    out.push_str(&format!(
        r#"<div style="text-align: center; margin-bottom: 20px;">
  <span style="background: {background}; color: {color}; padding: 8px 16px; border-radius: 20px; font-size: 12px; font-weight: bold;">{} - {}</span>
</div>
"#,
        project.project_type.name(),
        project.grouping.name()
    ));
}

fn render_field(out: &mut String, label: &str, value: &str, layout: Layout, last: bool) {
    let margin = if last { "" } else { "margin-bottom: 12px;" };
    out.push_str(&format!(
        r#"    <div style="{margin}">
      <div style="font-weight: bold; margin-bottom: 4px; font-size: 13px; color: {TEXT_COLOR};">{label}:</div>
      <div style="{DASHED} padding-bottom: 3px; font-size: 13px; min-height: 18px;">{}</div>
    </div>
"#,
        if value.is_empty() {
            layout.placeholder()
        } else {
            value
        }
    ));
}

fn render_members(out: &mut String, members: &[Member]) {
    let lines: Vec<String> = members
        .iter()
        .enumerate()
        .map(|(idx, member)| {
            format!(
                "{}. {} ({})",
                idx + 1,
                escape_html(member.name.trim()),
                escape_html(member.contact.trim())
            )
        })
        .collect();
    out.push_str(&format!(
        r#"    <div class="group-members" style="margin-bottom: 12px;">
      <div style="font-weight: bold; margin-bottom: 4px; font-size: 13px; color: {TEXT_COLOR};">{}:</div>
      <div style="{DASHED} padding-bottom: 3px; font-size: 12px; min-height: 18px; line-height: 1.6;">{}</div>
    </div>
"#,
        Messages::GroupMembers.msg(),
        lines.join("<br>")
    ));
}

fn render_metadata(
    out: &mut String,
    header: &InvoiceHeader,
    project: Option<&ProjectContext>,
    layout: Layout,
) {
    let placeholder = layout.placeholder();
    out.push_str(&format!(
        r#"<div style="display: grid; grid-template-columns: 1fr 1fr; gap: 30px; position: relative; z-index: 1; {}">
  <div>
"#,
        layout.section_margin()
    ));
    render_field(
        out,
        Messages::ClientName.msg(),
        &text_or(&header.client_name, placeholder),
        layout,
        false,
    );
    render_field(
        out,
        Messages::ProjectName.msg(),
        &text_or(&header.project_name, placeholder),
        layout,
        false,
    );
    render_field(
        out,
        Messages::CompanyName.msg(),
        &text_or(&header.company_name, placeholder),
        layout,
        false,
    );
    render_field(
        out,
        Messages::Country.msg(),
        &text_or(&header.country, DEFAULT_COUNTRY),
        layout,
        false,
    );
    if let Some(project) = project {
        let members = project.listed_members();
        if !members.is_empty() {
            render_members(out, members);
        }
    }
    render_field(
        out,
        Messages::ProposalNo.msg(),
        &text_or(&header.proposal_no, placeholder),
        layout,
        true,
    );
    out.push_str("  </div>\n  <div>\n");
    // the cost estimation reference is the proposal number
    render_field(
        out,
        Messages::CostEstimation.msg(),
        &text_or(&header.proposal_no, placeholder),
        layout,
        false,
    );
    render_field(
        out,
        Messages::InvoiceNo.msg(),
        &text_or(&header.invoice_no, placeholder),
        layout,
        false,
    );
    render_field(
        out,
        Messages::InvoiceDate.msg(),
        &format_date_short(&header.invoice_date),
        layout,
        false,
    );
    render_field(
        out,
        Messages::DueDate.msg(),
        &format_date_short(&header.due_date),
        layout,
        false,
    );
    render_field(
        out,
        Messages::Currency.msg(),
        &escape_html(header.currency()),
        layout,
        true,
    );
    out.push_str("  </div>\n</div>\n");
}

// TABLE

// -----------------------------------------------------------------
// | (Type) | Description | Status | Taxes | Date | Amount (CUR) |
// -----------------------------------------------------------------
// | BADGE  |             |        |       |      |     1 000.00 |
// -----------------------------------------------------------------
// Type is only shown on project invoices.
fn render_items(out: &mut String, items: &[LineItem], layout: Layout, currency: &str) {
    let cell = layout.cell();
    out.push_str(&format!(
        r#"<div style="position: relative; z-index: 1; {}">
  <table style="width: 100%; border-collapse: collapse; border: {BORDER};">
    <thead>
      <tr style="background-color: {FILL_COLOR};">
"#,
        layout.section_margin()
    ));
    let mut headings = vec![];
    if layout == Layout::Project {
        headings.push(Messages::Type.msg());
    }
    headings.extend([
        Messages::Description.msg(),
        Messages::Status.msg(),
        Messages::Taxes.msg(),
        Messages::Date.msg(),
    ]);
    for heading in headings {
        out.push_str(&format!(
            "        <th style=\"{cell} text-align: left; font-weight: bold;\">{heading}</th>\n"
        ));
    }
    out.push_str(&format!(
        "        <th style=\"{cell} text-align: right; font-weight: bold;\">{} ({currency})</th>\n      </tr>\n    </thead>\n    <tbody>\n",
        Messages::Amount.msg()
    ));

    for item in items {
        render_row(out, item, layout);
    }

    out.push_str("    </tbody>\n  </table>\n</div>\n");
}

fn render_row(out: &mut String, item: &LineItem, layout: Layout) {
    let cell = layout.cell();
    out.push_str("      <tr class=\"item-row\">\n");
    if layout == Layout::Project {
        out.push_str(&format!(
            "        <td style=\"{cell}\">{}</td>\n",
            layout.item_kind(item.kind).map(render_badge).unwrap_or_default()
        ));
    }
    let taxes = item
        .taxes
        .as_deref()
        .map(|t| text_or(t, layout.missing_taxes()))
        .unwrap_or_else(|| layout.missing_taxes().to_owned());
    out.push_str(&format!(
        r#"        <td style="{cell}">{}</td>
        <td style="{cell}">{}</td>
        <td style="{cell}">{taxes}</td>
        <td style="{cell}">{}</td>
        <td style="{cell} text-align: right;">{}</td>
      </tr>
"#,
        text_or(&item.description, ""),
        text_or(&item.status, ""),
        layout.item_date(&item.date),
        format_amount(&item.amount)
    ));
}

fn render_badge(kind: ItemKind) -> String {
    let (background, color) = match kind {
        ItemKind::Advance => ("#f3e8ff", "#7c3aed"),
        ItemKind::Milestone => ("#dbeafe", "#1e40af"),
    };
    format!(
        r#"<span style="background: {background}; color: {color}; padding: 4px 8px; border-radius: 12px; font-size: 10px; font-weight: bold;">{}</span>"#,
        kind.name()
    )
}

fn render_summary(
    out: &mut String,
    totals: &InvoiceTotals,
    layout: Layout,
    currency: &str,
) {
    out.push_str(&format!(
        r#"<div style="display: grid; grid-template-columns: 1.5fr 1fr; gap: 25px; position: relative; z-index: 1; {}">
"#,
        layout.section_margin()
    ));
    render_bank_details(out, layout);

    out.push_str("  <div>\n");
    if layout == Layout::AdHoc {
        out.push_str(&format!(
            "    <div style=\"font-weight: bold; margin-bottom: 15px; font-size: 16px;\">{}</div>\n",
            Messages::CurrentPayment.msg()
        ));
    }
    out.push_str(&format!(
        "    <table style=\"width: 100%; border-collapse: collapse; border: {BORDER}; margin-bottom: 15px;\">\n"
    ));
    render_sum_row(out, Messages::Subtotal, &totals.subtotal, currency, false);
    if layout == Layout::AdHoc {
        render_sum_row(
            out,
            Messages::Discount,
            totals.discount.as_deref().unwrap_or("0"),
            currency,
            false,
        );
        render_sum_row(
            out,
            Messages::Tax,
            totals.tax.as_deref().unwrap_or("0"),
            currency,
            false,
        );
    }
    render_sum_row(out, Messages::Total, &totals.total, currency, true);
    out.push_str("    </table>\n");

    out.push_str(&format!(
        r#"    <div style="font-size: 16px; color: {PRIMARY_COLOR}; font-weight: bold; line-height: 1.5;">{}<br><span style="font-size: 20px;">{} {currency}</span></div>
  </div>
</div>
"#,
        Messages::InvoiceIsPaymentFor.msg(),
        format_amount(&totals.total)
    ));
}

fn render_sum_row(out: &mut String, label: Messages, amount: &str, currency: &str, total: bool) {
    let (row_style, weight) = if total {
        (format!(" style=\"background-color: {FILL_COLOR};\""), " font-weight: bold;")
    } else {
        (String::new(), "")
    };
    out.push_str(&format!(
        r#"      <tr{row_style}>
        <td style="border: {BORDER}; padding: 8px 10px; font-weight: bold; font-size: 12px; color: {TEXT_COLOR};">{} ({currency})</td>
        <td style="border: {BORDER}; padding: 8px 10px; text-align: right; font-size: 12px; color: {TEXT_COLOR};{weight}">{}</td>
      </tr>
"#,
        label.msg(),
        format_amount(amount)
    ));
}

fn render_bank_details(out: &mut String, layout: Layout) {
    let frame = match layout {
        Layout::AdHoc => "",
        Layout::Project => "border: 1px solid #d1d5db; padding: 15px;",
    };
    out.push_str(&format!(
        r#"  <div class="bank-details" style="{frame}">
    <div style="font-weight: bold; margin-bottom: 12px; font-size: 14px; color: {HEADING_COLOR};">{}</div>
    <div style="font-size: 12px; line-height: 1.9; color: {TEXT_COLOR};">
"#,
        Messages::BankDetails.msg()
    ));
    for (label, value) in layout.bank_details() {
        out.push_str(&format!(
            "      <div><strong>{label}:</strong> {value}</div>\n"
        ));
    }
    out.push_str("    </div>\n  </div>\n");
}

// comments and payment instructions
fn render_post(out: &mut String, layout: Layout) {
    let (notice_label, notice) = layout.payment_reference_notice();
    let frame = match layout {
        Layout::AdHoc => "margin-top: 30px;",
        Layout::Project => "margin: 0 30px 25px 30px; border: 1px solid #d1d5db; padding: 15px;",
    };
    out.push_str(&format!(
        r#"<div class="payment-instructions" style="position: relative; z-index: 1; {frame}">
  <div style="font-weight: bold; margin-bottom: 10px; font-size: 14px; color: {HEADING_COLOR};">{}</div>
  <div style="font-size: 11px; line-height: 1.7; color: {TEXT_COLOR};">
    <div style="margin-bottom: 8px;"><strong>{notice_label}</strong> {notice}</div>
    <div>{}</div>
  </div>
</div>
"#,
        Messages::CommentsOrSpecialInstructions.msg(),
        layout.due_date_notice()
    ));
}

fn render_footer(out: &mut String) {
    out.push_str(&format!(
        r#"<div style="background: linear-gradient(to right, {PRIMARY_COLOR}, {SECONDARY_COLOR}); padding: 25px 30px; margin-top: 20px;">
  <div style="color: rgba(255, 255, 255, 0.9); font-size: 10px; text-align: center;">&nbsp;</div>
</div>
"#
    ));
}
