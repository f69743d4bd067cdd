// Business constants printed on every invoice.

pub(crate) const BRAND_NAME: &str = "EXE.LK";
pub(crate) const TAGLINE: &str = "Make your idea executable.";
pub(crate) const WEBSITE: &str = "www.exe.lk";
pub(crate) const EMAIL: &str = "hello@exe.lk";
pub(crate) const PHONE: &str = "+94 70 274 9876 / +94 76 682 8306";

pub(crate) const PRIMARY_COLOR: &str = "#2563eb";
pub(crate) const SECONDARY_COLOR: &str = "#16a34a";

const ACCOUNT_NO: (&str, &str) = ("Account No", "1000661376");
const SWIFT_CODE: (&str, &str) = ("Swift Code", "CCEYLKLX");
const BANK: (&str, &str) = ("Bank", "Commercial Bank");
const BRANCH: (&str, &str) = ("Branch Name", "Homagama");
const ADDRESS: (&str, &str) = (
    "Address",
    "289/9A, 5th Lane, Kulasiri Kumarage Mawatha, Katuwana, Homagama.",
);
const BANK_COUNTRY: (&str, &str) = ("Country", "Sri Lanka");

// the two invoice kinds were printed with slightly different account names
pub(crate) const ADHOC_BANK_DETAILS: [(&str, &str); 7] = [
    ACCOUNT_NO,
    ("Name", "EXE.LK (PVT) LTD"),
    SWIFT_CODE,
    BANK,
    BRANCH,
    ADDRESS,
    BANK_COUNTRY,
];
pub(crate) const PROJECT_BANK_DETAILS: [(&str, &str); 7] = [
    ACCOUNT_NO,
    ("Name", "EXE LK (PVT) LTD"),
    SWIFT_CODE,
    BANK,
    BRANCH,
    ADDRESS,
    BANK_COUNTRY,
];

pub(crate) const ADHOC_NOTICE_LABEL: &str = "Important:";
pub(crate) const PROJECT_NOTICE_LABEL: &str = "Important Note:";
pub(crate) const ADHOC_PAYMENT_REFERENCE_NOTICE: &str = "Please do not forget to mention your Invoice number as the reference when you are depositing at the bank counter or the deposit machine since your payment is traced via the invoice number. Further, you are requested to email us a copy of the deposit slip or the screenshot of the online transfer / CEFT Transfer to finance@exe.lk on the payment date itself. (Please mention the Invoice Number In the Description).";
pub(crate) const PROJECT_PAYMENT_REFERENCE_NOTICE: &str = "Please do not forget to mention your Invoice number as the reference when you are depositing at the bank counter or the deposit machine since your payment is traced via the invoice number. Further, you are requested to email us a copy of the deposit slip or the screenshot of the online transfer / CEFT Transfer to finance@exe.lk on the payment date itself. (Please mention the Invoice Number in the Description).";
pub(crate) const ADHOC_DUE_DATE_NOTICE: &str =
    "To avoid extending the upcoming projects duration, please pay before the due date.";
pub(crate) const PROJECT_DUE_DATE_NOTICE: &str =
    "To avoid extending the payment duration, please pay before the due date.";
