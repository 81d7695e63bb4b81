//! Treasurer accessors: budget, balances, history, transactions and the
//! coach's fund.

use std::sync::Arc;

use super::{load_or_default, Dashboard};
use crate::parsers::{budget, coaches_fund, historical, transactions};
use crate::resolver::LogicalDoc;
use crate::types::{
    BudgetData, CoachsFundData, FundBalance, HistoricalBudget, HistoricalRevenueBySource,
    MonthlyBudgetData, Transaction, TransactionSummary,
};

const HISTORICAL_BUDGETS_KEY: &str = "historical-budgets";
const HISTORICAL_REVENUE_KEY: &str = "historical-revenue";

impl Dashboard {
    pub async fn current_budget(&self) -> Arc<BudgetData> {
        let this = self.clone();
        load_or_default("Current budget", move || {
            let path = this.resolver.resolve(LogicalDoc::CurrentBudget);
            this.cache.cached_parse(&path, budget::parse_budget_file)
        })
        .await
    }

    pub async fn monthly_budget(&self) -> Arc<Vec<MonthlyBudgetData>> {
        let this = self.clone();
        load_or_default("Monthly budget", move || {
            let path = this.resolver.resolve(LogicalDoc::CurrentBudget);
            let key = format!("{}:monthly", path.display());
            this.cache
                .cached_parse_keyed(&key, &path, budget::parse_monthly_file)
        })
        .await
    }

    pub async fn fund_balances(&self) -> Arc<FundBalance> {
        let this = self.clone();
        load_or_default("Fund balances", move || {
            let path = this.resolver.resolve(LogicalDoc::CurrentBudget);
            let key = format!("{}:balances", path.display());
            this.cache
                .cached_parse_keyed(&key, &path, budget::parse_fund_balances_file)
        })
        .await
    }

    /// One summary per fiscal year, ascending.
    pub async fn historical_budgets(&self) -> Arc<Vec<HistoricalBudget>> {
        let this = self.clone();
        load_or_default("Historical budgets", move || {
            let paths = this.resolver.historical_budget_files();
            this.cache.cached_multi_parse(
                &paths,
                historical::parse_historical_budgets,
                HISTORICAL_BUDGETS_KEY,
            )
        })
        .await
    }

    pub async fn historical_revenue(&self) -> Arc<Vec<HistoricalRevenueBySource>> {
        let this = self.clone();
        load_or_default("Historical revenue", move || {
            let paths = this.resolver.historical_budget_files();
            this.cache.cached_multi_parse(
                &paths,
                historical::parse_historical_revenue,
                HISTORICAL_REVENUE_KEY,
            )
        })
        .await
    }

    pub async fn transactions(&self) -> Arc<Vec<Transaction>> {
        let this = self.clone();
        load_or_default("Transactions", move || {
            let path = this.resolver.resolve(LogicalDoc::SquareTransactions);
            this.cache
                .cached_parse(&path, transactions::parse_transactions_file)
        })
        .await
    }

    pub async fn transaction_summary(&self) -> Arc<TransactionSummary> {
        let all = self.transactions().await;
        Arc::new(transactions::summarize_transactions(&all))
    }

    pub async fn coachs_fund(&self) -> Arc<CoachsFundData> {
        let this = self.clone();
        load_or_default("Coach's fund", move || {
            let path = this.resolver.resolve(LogicalDoc::CoachsFund);
            this.cache
                .cached_parse(&path, coaches_fund::parse_coachs_fund_file)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{dashboard_at, touch};
    use super::*;

    #[tokio::test]
    async fn test_missing_budget_is_empty_and_uncached() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = dashboard_at(dir.path());

        let budget = dashboard.current_budget().await;
        assert_eq!(*budget, BudgetData::default());
        assert!(dashboard.monthly_budget().await.is_empty());
        assert_eq!(*dashboard.fund_balances().await, FundBalance::default());
        assert!(dashboard.cache().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_workbooks_degrade() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), LogicalDoc::SquareTransactions.relative_path());
        touch(dir.path(), LogicalDoc::CoachsFund.relative_path());
        let dashboard = dashboard_at(dir.path());

        assert!(dashboard.transactions().await.is_empty());
        let summary = dashboard.transaction_summary().await;
        assert_eq!(summary.transaction_count, 0);
        assert!(dashboard.coachs_fund().await.entries.is_empty());
    }

    #[tokio::test]
    async fn test_historical_without_files_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = dashboard_at(dir.path());

        let first = dashboard.historical_budgets().await;
        let second = dashboard.historical_budgets().await;
        assert!(first.is_empty());
        assert!(Arc::ptr_eq(&first, &second));
        assert!(dashboard.historical_revenue().await.is_empty());
        assert_eq!(dashboard.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_accessors_join() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = dashboard_at(dir.path());
        let (budget, history, fund) = tokio::join!(
            dashboard.current_budget(),
            dashboard.historical_budgets(),
            dashboard.coachs_fund()
        );
        assert!(budget.income.is_empty());
        assert!(history.is_empty());
        assert_eq!(fund.current_balance, 0.0);
    }
}
