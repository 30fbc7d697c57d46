use crate::domain::payment::PaymentRecord;
use crate::domain::step::WizardStep;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct RecordRow<'a> {
    payment_id: &'a str,
    request_id: &'a str,
    status: &'static str,
    step: u8,
    amount: u64,
    gateway_order_id: &'a str,
    gateway_payment_id: &'a str,
    completed_at: String,
}

impl<'a> From<&'a PaymentRecord> for RecordRow<'a> {
    fn from(record: &'a PaymentRecord) -> Self {
        Self {
            payment_id: &record.id,
            request_id: &record.request_id,
            status: record.status.as_str(),
            step: WizardStep::for_status(record.status).number(),
            amount: record.amount,
            gateway_order_id: record.gateway_order_id.as_deref().unwrap_or(""),
            gateway_payment_id: record.gateway_payment_id.as_deref().unwrap_or(""),
            completed_at: record
                .completed_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

/// Writes cached payment records as CSV, one row per record.
pub struct RecordWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes the header followed by every record, then flushes.
    pub fn write_records(&mut self, records: &[PaymentRecord]) -> Result<()> {
        if records.is_empty() {
            self.writer.write_record([
                "payment_id",
                "request_id",
                "status",
                "step",
                "amount",
                "gateway_order_id",
                "gateway_payment_id",
                "completed_at",
            ])?;
        }
        for record in records {
            self.writer.serialize(RecordRow::from(record))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
