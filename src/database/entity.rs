//! Static allow-lists for the tables exposed through the record routes.
//!
//! Every writable column is declared here with the API field name callers send,
//! the fixed SQL identifier it maps to, and the kind used to coerce values before
//! binding. Statement builders only ever emit identifiers taken from these tables.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Integer,
    Numeric,
    Date,
    Boolean,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnDef {
    /// Key accepted in request bodies
    pub field: &'static str,
    /// Unquoted SQL identifier
    pub column: &'static str,
    pub kind: ColumnKind,
}

#[derive(Debug, Serialize)]
pub struct EntitySchema {
    /// Route segment and table name
    pub name: &'static str,
    pub table: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [ColumnDef],
    pub required: &'static [&'static str],
}

impl EntitySchema {
    pub fn lookup(name: &str) -> Option<&'static EntitySchema> {
        ENTITIES.iter().copied().find(|e| e.name == name)
    }

    pub fn column(&self, field: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn is_writable(&self, field: &str) -> bool {
        self.column(field).is_some()
    }
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef { field: name, column: name, kind }
}

use ColumnKind::{Boolean, Date, Integer, Numeric, Text};

pub static ALCHEMY_ROUTING: EntitySchema = EntitySchema {
    name: "Alchemy_Routing",
    table: "Alchemy_Routing",
    primary_key: "id",
    columns: &[
        col("Sl.No", Integer),
        col("Costing Date", Date),
        col("IBM / KYNDRYL", Text),
        col("Requestor", Text),
        col("Department SPOC", Text),
        col("SPOC E-mail ID", Text),
        col("Training / Services Details", Text),
        col("Description", Text),
        col("PAX", Integer),
        col("IBM / KYNDRYL PO No", Text),
        col("IBM / KYNDRYL PO Date", Date),
        col("IBM / KYNDRYL PO Value", Numeric),
        col("Duration / Days", Numeric),
        col("Payment INR / $", Text),
        col("Payment $ WHT %", Numeric),
        col("Gross Up $ Percentage", Numeric),
        col("Grossed Up Invoice $", Numeric),
        col("Vendor Payout", Numeric),
        col("Integration %", Numeric),
        col("Integrator Charges (Margin)", Numeric),
        col("Alchemy Billing Value", Numeric),
        col("Funding cost", Numeric),
        col("Net Margin", Numeric),
        col("Billing Month", Text),
        col("Payment Day's", Integer),
        col("Vendor Details", Text),
        col("Vendor SPOC", Text),
        col("Vendor SPOC Contact No", Text),
        col("Vendor SPOC E-mail ID", Text),
        col("Trainer Name", Text),
        col("Training Dates", Text),
        col("Vendor Inv. No.", Text),
        col("Vendor Inv. Date", Date),
        col("Vendor Inv. Amount", Numeric),
        col("CGST @ 9%", Numeric),
        col("SGST @ 9%", Numeric),
        col("IGST @ 18%", Numeric),
        col("Total Invoice", Numeric),
        col("Vendor Amount After TDS 10%", Numeric),
        col("Net Payment to Vendor", Numeric),
        col("Payment Due Date", Date),
        col("Payment Due Week", Text),
        col("Alchemy Techsol Invoive No", Text),
        col("Alchemy Techsol Invoice Date", Date),
        col("Alchemy Techsol Invoice Amount", Numeric),
        col("Payment Expected Date (IBM)", Date),
        col("Cheque Issued Name", Text),
        col("Cheque Date", Date),
        col("Cheque No", Text),
        col("Cheque Amount", Numeric),
        col("REMARK", Text),
    ],
    required: &["Sl.No", "Costing Date", "IBM / KYNDRYL"],
};

pub static CTS: EntitySchema = EntitySchema {
    name: "CTS",
    table: "CTS",
    primary_key: "id",
    columns: &[
        col("vendor_name", Text),
        col("vendor_email", Text),
        col("vendor_contact", Text),
        col("client_name", Text),
        col("training_name", Text),
        col("training_mode", Text),
        col("start_date", Date),
        col("end_date", Date),
        col("duration_days", Integer),
        col("pax", Integer),
        col("trainer_cost", Numeric),
        col("travel_cost", Numeric),
        col("other_cost", Numeric),
        col("total_cost", Numeric),
        col("billing_amount", Numeric),
        col("margin", Numeric),
        col("po_number", Text),
        col("invoice_number", Text),
        col("invoice_date", Date),
        col("payment_status", Text),
        col("is_closed", Boolean),
        col("remarks", Text),
    ],
    required: &["vendor_name"],
};

pub static TEAM_REPORT: EntitySchema = EntitySchema {
    name: "team_report",
    table: "team_report",
    primary_key: "id",
    columns: &[
        col("member_name", Text),
        col("report_date", Date),
        col("client_name", Text),
        col("vendor_name", Text),
        col("activity", Text),
        col("status", Text),
        col("hours_spent", Numeric),
        col("follow_up_date", Date),
        col("remarks", Text),
    ],
    required: &["member_name", "report_date"],
};

pub static ENTITIES: &[&EntitySchema] = &[&ALCHEMY_ROUTING, &CTS, &TEAM_REPORT];
