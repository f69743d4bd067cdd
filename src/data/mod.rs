use crate::BillpressError;
use crate::messages::Messages;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::read_to_string;
use std::path::Path;

pub(crate) mod currency;

/// Invoice input, tagged by the shape the caller has at hand: an ad-hoc
/// "quick invoice" or an invoice belonging to a persisted project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub(crate) enum InvoiceData {
    #[serde(rename = "adhoc")]
    AdHoc(AdHocInvoice),
    #[serde(rename = "project")]
    Project(ProjectInvoice),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AdHocInvoice {
    #[serde(default)]
    pub(crate) header: InvoiceHeader,
    #[serde(default)]
    pub(crate) items: Vec<LineItem>,
    #[serde(default)]
    pub(crate) totals: InvoiceTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ProjectInvoice {
    #[serde(default)]
    pub(crate) header: InvoiceHeader,
    pub(crate) project: ProjectContext,
    #[serde(default)]
    pub(crate) items: Vec<LineItem>,
    #[serde(default)]
    pub(crate) totals: InvoiceTotals,
}

impl InvoiceData {
    pub(crate) fn header(&self) -> &InvoiceHeader {
        match self {
            InvoiceData::AdHoc(invoice) => &invoice.header,
            InvoiceData::Project(invoice) => &invoice.header,
        }
    }

    pub(crate) fn items(&self) -> &[LineItem] {
        match self {
            InvoiceData::AdHoc(invoice) => &invoice.items,
            InvoiceData::Project(invoice) => &invoice.items,
        }
    }

    pub(crate) fn totals(&self) -> &InvoiceTotals {
        match self {
            InvoiceData::AdHoc(invoice) => &invoice.totals,
            InvoiceData::Project(invoice) => &invoice.totals,
        }
    }

    pub(crate) fn project(&self) -> Option<&ProjectContext> {
        match self {
            InvoiceData::AdHoc(_) => None,
            InvoiceData::Project(invoice) => Some(&invoice.project),
        }
    }

    pub(crate) fn invoice_no(&self) -> &str {
        self.header().invoice_no.trim()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct InvoiceHeader {
    pub(crate) client_name: String,
    pub(crate) project_name: String,
    pub(crate) company_name: String,
    pub(crate) country: String,
    pub(crate) proposal_no: String,
    pub(crate) invoice_no: String,
    pub(crate) invoice_date: String,
    pub(crate) due_date: String,
    pub(crate) currency: String,
}

pub(crate) const DEFAULT_COUNTRY: &str = "Sri Lanka";
pub(crate) const DEFAULT_CURRENCY: &str = "LKR";

impl InvoiceHeader {
    pub(crate) fn currency(&self) -> &str {
        match self.currency.trim() {
            "" => DEFAULT_CURRENCY,
            currency => currency,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LineItem {
    #[serde(default)]
    pub(crate) kind: Option<ItemKind>,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) taxes: Option<String>,
    #[serde(default)]
    pub(crate) date: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub(crate) amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ItemKind {
    Advance,
    Milestone,
}

impl ItemKind {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            ItemKind::Advance => Messages::Advance.msg(),
            ItemKind::Milestone => Messages::Milestone.msg(),
        }
    }
}

// rendered as given, no arithmetic is implied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct InvoiceTotals {
    #[serde(default, deserialize_with = "string_or_number")]
    pub(crate) subtotal: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub(crate) discount: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub(crate) tax: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub(crate) total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ProjectContext {
    pub(crate) project_type: ProjectType,
    pub(crate) grouping: Grouping,
    #[serde(default)]
    pub(crate) members: Vec<Member>,
}

impl ProjectContext {
    /// Members are only listed for group projects.
    pub(crate) fn listed_members(&self) -> &[Member] {
        match self.grouping {
            Grouping::Group => &self.members,
            Grouping::Individual => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ProjectType {
    FinalYear,
    Industry,
}

impl ProjectType {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            ProjectType::FinalYear => Messages::FinalYearProject.msg(),
            ProjectType::Industry => Messages::IndustryProject.msg(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Grouping {
    Group,
    Individual,
}

impl Grouping {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Grouping::Group => Messages::Group.msg(),
            Grouping::Individual => Messages::Individual.msg(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Member {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) contact: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(val: StringOrNumber) -> Self {
        match val {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(i) => i.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }
    }
}

// amounts arrive as strings from forms and as numbers from stored projects
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

pub(crate) fn load_invoice_data(path: &Path) -> Result<InvoiceData, BillpressError> {
    let content = read_to_string(path).map_err(|e| {
        BillpressError::InputError(format!(
            "{}: {:?}, {}",
            Messages::CouldNotReadInvoiceFile.msg(),
            path,
            e
        ))
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    parse_invoice_data(&content, is_json).map_err(|e| {
        BillpressError::InputError(format!(
            "{}: {:?}, {}",
            Messages::CouldNotParseInvoiceFile.msg(),
            path,
            e
        ))
    })
}

fn parse_invoice_data(content: &str, is_json: bool) -> Result<InvoiceData, String> {
    if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT_TOML: &str = r#"
kind = "project"

[header]
client_name = "Nimal Perera"
project_name = "Smart Irrigation"
invoice_no = "INV-014"
invoice_date = "2024-03-05"

[project]
project_type = "final-year"
grouping = "group"

[[project.members]]
name = "Nimal"
contact = "0771234567"

[[project.members]]
name = "Kamal"
contact = "0712345678"

[[items]]
kind = "advance"
description = "Initial advance"
status = "Paid"
date = "2024-03-01"
amount = 25000

[[items]]
kind = "milestone"
description = "Prototype"
status = "Pending"
date = "2024-04-01"
amount = "40000.50"

[totals]
subtotal = 65000.5
total = "65000.50"
"#;

    #[test]
    fn parse_project_from_toml() {
        let data = parse_invoice_data(PROJECT_TOML, false).unwrap();
        let project = data.project().unwrap();
        assert_eq!(project.project_type, ProjectType::FinalYear);
        assert_eq!(project.grouping, Grouping::Group);
        assert_eq!(project.listed_members().len(), 2);
        assert_eq!(data.invoice_no(), "INV-014");
        assert_eq!(data.items().len(), 2);
        assert_eq!(data.items()[0].kind, Some(ItemKind::Advance));
        assert_eq!(data.items()[0].amount, "25000");
        assert_eq!(data.items()[1].amount, "40000.50");
        assert_eq!(data.totals().subtotal, "65000.5");
        assert_eq!(data.totals().discount, None);
    }

    #[test]
    fn parse_adhoc_from_json() {
        let json = r#"{
            "kind": "adhoc",
            "header": { "invoice_no": "INV-001" },
            "items": [{ "description": "Design", "amount": "1000" }],
            "totals": { "subtotal": "1000", "discount": 0, "tax": "50", "total": "1050" }
        }"#;
        let data = parse_invoice_data(json, true).unwrap();
        assert!(data.project().is_none());
        assert_eq!(data.items()[0].kind, None);
        assert_eq!(data.totals().discount.as_deref(), Some("0"));
        assert_eq!(data.totals().tax.as_deref(), Some("50"));
        assert_eq!(data.header().currency(), DEFAULT_CURRENCY);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let data = parse_invoice_data(r#"kind = "adhoc""#, false).unwrap();
        assert_eq!(data.invoice_no(), "");
        assert!(data.items().is_empty());
        assert_eq!(data.totals(), &InvoiceTotals::default());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(parse_invoice_data(r#"kind = "receipt""#, false).is_err());
    }

    #[test]
    fn individual_projects_list_no_members() {
        let project = ProjectContext {
            project_type: ProjectType::Industry,
            grouping: Grouping::Individual,
            members: vec![Member {
                name: String::from("Nimal"),
                contact: String::from("0771234567"),
            }],
        };
        assert!(project.listed_members().is_empty());
    }
}
