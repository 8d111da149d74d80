//! Account listing

use std::sync::Arc;

use bank_shared::Page;
use tracing::debug;

use crate::domain::{AccountQuery, AccountView};
use crate::error::DomainError;
use crate::repositories::AccountRepository;

pub struct AccountQueryService {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountQueryService {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn list(&self, query: &AccountQuery) -> Result<Page<AccountView>, DomainError> {
        let (items, total) = self.accounts.search(query).await?;

        debug!(
            total,
            page = query.pagination.page,
            per_page = query.pagination.per_page,
            sort = query.sort.as_str(),
            order = query.order.as_str(),
            "Accounts listed"
        );

        Ok(Page::new(items, query.pagination, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, AccountType, Currency, ListAccountsParams};
    use crate::repositories::MockAccountRepository;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn view(n: u16) -> AccountView {
        AccountView {
            account: Account::open(
                format!("SN240101000000{:04}", n),
                AccountType::Epargne,
                Decimal::new(25_000, 0),
                Currency::Xof,
                Uuid::new_v4(),
                Utc::now(),
            ),
            holder_last_name: "Ndiaye".into(),
            holder_first_name: "Moussa".into(),
        }
    }

    #[tokio::test]
    async fn page_counters_follow_total() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_search()
            .withf(|q| !q.includes_deleted() && q.pagination.page == 2)
            .returning(|_| Ok(((1000..1010).map(view).collect(), 25)));

        let query = AccountQuery::parse(&ListAccountsParams {
            page: Some(2),
            ..Default::default()
        })
        .unwrap();
        let page = AccountQueryService::new(Arc::new(accounts))
            .list(&query)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.last_page(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[tokio::test]
    async fn empty_result_still_has_one_page() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_search().returning(|_| Ok((vec![], 0)));

        let page = AccountQueryService::new(Arc::new(accounts))
            .list(&AccountQuery::default())
            .await
            .unwrap();

        assert_eq!(page.last_page(), 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }
}
