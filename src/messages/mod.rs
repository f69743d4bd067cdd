#[derive(Debug, Clone, Copy)]
pub(crate) enum Messages {
    // General
    Title,

    // Invoice metadata
    PaymentInvoice,
    ClientName,
    ProjectName,
    CompanyName,
    Country,
    ProposalNo,
    CostEstimation,
    InvoiceNo,
    InvoiceDate,
    DueDate,
    Currency,
    GroupMembers,

    // Project badges
    FinalYearProject,
    IndustryProject,
    Group,
    Individual,

    // Items
    Type,
    Description,
    Status,
    Taxes,
    Date,
    Amount,
    Advance,
    Milestone,
    NotApplicable,

    // Summary
    BankDetails,
    CurrentPayment,
    Subtotal,
    Discount,
    Tax,
    Total,
    InvoiceIsPaymentFor,
    CommentsOrSpecialInstructions,

    // Infos
    PDFCreated,
    MarkupCreated,

    // Errors
    CouldNotReadInvoiceFile,
    CouldNotParseInvoiceFile,
    CouldNotCreateSurface,
    CouldNotRemoveSurface,
    RasterizationFailed,
    PDFNotCreated,
    CouldNotOpenFile,
    TotalsDoNotAddUp,
}

impl Messages {
    pub(crate) fn msg(&self) -> &'static str {
        match self {
            Messages::Title => "billpress",

            Messages::PaymentInvoice => "PAYMENT INVOICE",
            Messages::ClientName => "Client Name",
            Messages::ProjectName => "Project Name",
            Messages::CompanyName => "Company Name",
            Messages::Country => "Country",
            Messages::ProposalNo => "Proposal No",
            Messages::CostEstimation => "Cost Estimation",
            Messages::InvoiceNo => "Invoice No",
            Messages::InvoiceDate => "Invoice Date",
            Messages::DueDate => "Due Date",
            Messages::Currency => "Currency",
            Messages::GroupMembers => "Group Members",

            Messages::FinalYearProject => "FINAL YEAR PROJECT",
            Messages::IndustryProject => "INDUSTRY PROJECT",
            Messages::Group => "GROUP",
            Messages::Individual => "INDIVIDUAL",

            Messages::Type => "Type",
            Messages::Description => "Description",
            Messages::Status => "Status",
            Messages::Taxes => "Taxes",
            Messages::Date => "Date",
            Messages::Amount => "Amount",
            Messages::Advance => "ADVANCE",
            Messages::Milestone => "MILESTONE",
            Messages::NotApplicable => "N/A",

            Messages::BankDetails => "Bank Details",
            Messages::CurrentPayment => "Current Payment",
            Messages::Subtotal => "SUBTOTAL",
            Messages::Discount => "DISCOUNT",
            Messages::Tax => "TAX",
            Messages::Total => "TOTAL",
            Messages::InvoiceIsPaymentFor => "This invoice is payment for",
            Messages::CommentsOrSpecialInstructions => "Comments or Special Instructions",

            Messages::PDFCreated => "Invoice PDF created",
            Messages::MarkupCreated => "Invoice markup created",

            Messages::CouldNotReadInvoiceFile => "Invoice file could not be read",
            Messages::CouldNotParseInvoiceFile => "Invoice file is not valid invoice data",
            Messages::CouldNotCreateSurface => "Render surface could not be created",
            Messages::CouldNotRemoveSurface => "Render surface could not be removed",
            Messages::RasterizationFailed => "Invoice could not be rasterized",
            Messages::PDFNotCreated => "Invoice PDF was not created",
            Messages::CouldNotOpenFile => "File could not be opened",
            Messages::TotalsDoNotAddUp => "Invoice totals do not add up",
        }
    }
}

impl std::fmt::Display for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.msg())
    }
}
