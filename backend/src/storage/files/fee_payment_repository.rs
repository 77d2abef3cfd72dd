use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::{Reader, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::BufReader;
use tracing::info;

use super::connection::FileConnection;
use crate::domain::models::fees::FeePayment;
use crate::storage::traits::FeePaymentStorage;

/// Append-only CSV payment log shared by all students
#[derive(Clone)]
pub struct FeePaymentRepository {
    connection: FileConnection,
}

impl FeePaymentRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }

    fn read_payments(&self) -> Result<Vec<FeePayment>> {
        let file_path = self.connection.fee_payments_file();
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut payments = Vec::new();
        for (index, result) in csv_reader.deserialize::<FeePayment>().enumerate() {
            let payment = result.with_context(|| {
                format!("Malformed row {} in {}", index + 2, file_path.display())
            })?;
            payments.push(payment);
        }
        Ok(payments)
    }
}

#[async_trait]
impl FeePaymentStorage for FeePaymentRepository {
    async fn append_payment(&self, payment: &FeePayment) -> Result<()> {
        let _guard = self.connection.payment_log_lock().lock().await;

        let file_path = self.connection.fee_payments_file();
        let needs_header = std::fs::metadata(&file_path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new().create(true).append(true).open(&file_path)?;
        let mut csv_writer = WriterBuilder::new().has_headers(needs_header).from_writer(file);
        csv_writer.serialize(payment)?;
        csv_writer.flush()?;

        info!(
            "Appended payment {} for student {}: {} semester {} amount {:.2}",
            payment.id, payment.student_id, payment.fee_type, payment.semester, payment.amount
        );
        Ok(())
    }

    async fn list_payments_for_student(&self, student_id: &str) -> Result<Vec<FeePayment>> {
        let mut payments = self.read_payments()?;
        payments.retain(|p| p.student_id == student_id);
        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::files::test_utils::{sample_payment, TestEnvironment};

    #[tokio::test]
    async fn test_append_keeps_order_and_single_header() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeePaymentRepository::new(env.connection.clone());

        repo.append_payment(&sample_payment("student-a", 1, "tuition", 1000.0)).await.unwrap();
        repo.append_payment(&sample_payment("student-b", 1, "tuition", 500.0)).await.unwrap();
        repo.append_payment(&sample_payment("student-a", 1, "library", 300.0)).await.unwrap();

        let payments = repo.list_payments_for_student("student-a").await.unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].fee_type, "tuition");
        assert_eq!(payments[1].fee_type, "library");

        let raw = std::fs::read_to_string(env.connection.fee_payments_file()).unwrap();
        assert_eq!(raw.matches("student_id").count(), 1);
        assert_eq!(raw.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_interleave() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeePaymentRepository::new(env.connection.clone());

        let mut handles = Vec::new();
        for i in 0..20 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.append_payment(&sample_payment("student-a", 1, "tuition", i as f64 + 1.0)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let payments = repo.list_payments_for_student("student-a").await.unwrap();
        assert_eq!(payments.len(), 20);
        let total: f64 = payments.iter().map(|p| p.amount).sum();
        assert_eq!(total, 210.0);
    }
}
