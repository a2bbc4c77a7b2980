//! Sales pipeline report: lead funnel plus the money collected in a period.

use anyhow::{anyhow, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use shared::{EntryType, LeadStatus, PipelineReport};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::backend::domain::commands::{EntryListFilter, MonthPeriod};
use crate::backend::domain::models::{AccountingEntry, Lead};
use crate::backend::domain::payment_recompute::round_money;
use crate::backend::storage::{AccountingStorage, Connection, LeadStorage, ReportCache};

const ALL_TIME: &str = "all";

#[derive(Clone)]
pub struct ReportService<C: Connection> {
    lead_repository: C::LeadRepository,
    entry_repository: C::AccountingRepository,
    cache: Arc<dyn ReportCache>,
}

impl<C: Connection> ReportService<C> {
    pub fn new(connection: Arc<C>, cache: Arc<dyn ReportCache>) -> Self {
        Self {
            lead_repository: connection.create_lead_repository(),
            entry_repository: connection.create_accounting_repository(),
            cache,
        }
    }

    /// Build the report for `month` ("YYYY-MM"), or all time when absent.
    ///
    /// Returns the report and whether it was served from cache. `refresh`
    /// skips the cache lookup; the freshly built report replaces the cached one.
    pub async fn pipeline_report(&self, month: Option<&str>, refresh: bool) -> Result<(PipelineReport, bool)> {
        let period = month.map(MonthPeriod::parse).transpose()?;
        let key = period.map_or_else(|| ALL_TIME.to_string(), |period| period.label());

        if !refresh {
            if let Some(report) = self.cache.get(&key) {
                info!("Pipeline report {} served from cache", key);
                return Ok((report, true));
            }
        }

        let leads: Vec<Lead> = self
            .lead_repository
            .list_leads(None)
            .await?
            .into_iter()
            .filter(|lead| period.map_or(true, |period| period.contains(lead.created_at.date_naive())))
            .collect();
        let entries = self
            .entry_repository
            .list_entries(&EntryListFilter { lead_id: None, period })
            .await?;

        let report = build_report(key.clone(), &leads, &entries)?;
        info!(
            "Built pipeline report {}: {} leads, {} entries, collected {}",
            key,
            leads.len(),
            report.entry_count,
            report.total_collected
        );

        self.cache.put(&key, report.clone());
        Ok((report, false))
    }
}

fn build_report(period: String, leads: &[Lead], entries: &[AccountingEntry]) -> Result<PipelineReport> {
    let mut lead_counts: BTreeMap<String, u32> = LeadStatus::ALL
        .iter()
        .map(|status| (status.as_str().to_string(), 0))
        .collect();
    for lead in leads {
        *lead_counts.entry(lead.status.as_str().to_string()).or_default() += 1;
    }

    let closed = lead_counts.get(LeadStatus::Closed.as_str()).copied().unwrap_or(0);
    let conversion_rate = if leads.is_empty() {
        round_money(Decimal::ZERO)
    } else {
        round_money(Decimal::from(closed) * Decimal::ONE_HUNDRED / Decimal::from(leads.len()))
    };

    let sum = |value: fn(&AccountingEntry) -> Decimal| -> Result<Decimal> {
        entries
            .iter()
            .map(value)
            .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
            .map(round_money)
            .ok_or_else(|| anyhow!("Report totals for {} overflowed", period))
    };

    Ok(PipelineReport {
        generated_at: Utc::now().to_rfc3339(),
        lead_counts,
        conversion_rate,
        entry_count: entries.len() as u32,
        total_collected: sum(|entry| entry.amount)?,
        total_outstanding: sum(|entry| match entry.entry_type {
            EntryType::Deposit => entry.remaining_amount.unwrap_or_default(),
            EntryType::Balance | EntryType::FullPayment => Decimal::ZERO,
        })?,
        total_commission_closer: sum(|entry| entry.commission_closer)?,
        total_commission_formateur: sum(|entry| entry.commission_formateur)?,
        period,
    })
}
