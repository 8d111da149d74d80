// ============================================================================
// Bank Core - Account Service
// File: crates/bank-core/src/services/account_service.rs
// ============================================================================
//! Account lifecycle: open, fetch, edit the holder, close

use std::sync::Arc;

use bank_shared::constants::MIN_INITIAL_BALANCE;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    Account, AccountType, AccountView, ClientFields, ClientReference, ClosedAccount, Currency,
};
use crate::error::{DomainError, FieldErrors};
use crate::repositories::{AccountRepository, ClientRepository};
use crate::services::account_number::AccountNumberGenerator;
use crate::services::client_resolver::{ensure_unique, ClientResolver};
use crate::validation::push_error;

/// Error keys for the client fields of an update payload.
pub const UPDATE_FIELD_PREFIX: &str = "informationsClient.";

const HOLDER_MIN_LENGTH: usize = 2;
const HOLDER_MAX_LENGTH: usize = 255;

/// Input of [`AccountService::create`]. Absent values are reported as validation errors.
#[derive(Debug, Clone, Default)]
pub struct CreateAccount {
    pub account_type: Option<String>,
    pub initial_balance: Option<Decimal>,
    pub currency: Option<String>,
    pub client: ClientReference,
}

/// Input of [`AccountService::update_client_info`].
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    /// Full name, "nom prenom..."
    pub holder: Option<String>,
    pub client: ClientFields,
}

pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    clients: Arc<dyn ClientRepository>,
    resolver: ClientResolver,
    numbers: AccountNumberGenerator,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        clients: Arc<dyn ClientRepository>,
        resolver: ClientResolver,
    ) -> Self {
        Self {
            numbers: AccountNumberGenerator::new(accounts.clone()),
            accounts,
            clients,
            resolver,
        }
    }

    pub async fn create(&self, cmd: CreateAccount) -> Result<AccountView, DomainError> {
        let (account_type, initial_balance, currency) = validate_opening(&cmd)?;

        let client = self.resolver.resolve(&cmd.client).await?;

        let now = Utc::now();
        let number = self.numbers.generate(now).await?;
        let account = Account::open(number, account_type, initial_balance, currency, client.id, now);
        let account = self.accounts.create(&account).await?;

        info!(
            account_id = %account.id,
            account_number = %account.account_number,
            client_id = %client.id,
            account_type = account.account_type.as_str(),
            "Account created"
        );

        Ok(AccountView {
            account,
            holder_last_name: client.last_name,
            holder_first_name: client.first_name,
        })
    }

    pub async fn get(&self, id: &Uuid) -> Result<AccountView, DomainError> {
        self.accounts
            .find_view(id)
            .await?
            .ok_or_else(|| DomainError::AccountNotFound(id.to_string()))
    }

    /// Edits the holder of a visible account. Only present fields are written.
    pub async fn update_client_info(
        &self,
        id: &Uuid,
        cmd: UpdateAccount,
    ) -> Result<AccountView, DomainError> {
        let fields = merged_update_fields(&cmd)?;

        let view = self.get(id).await?;
        let client_id = view.account.client_id;

        let fields = fields.checked(UPDATE_FIELD_PREFIX)?;
        ensure_unique(self.clients.as_ref(), &fields, Some(client_id), UPDATE_FIELD_PREFIX).await?;

        let mut client = self
            .clients
            .find_by_id(&client_id)
            .await?
            .ok_or_else(|| DomainError::ClientNotFound(client_id.to_string()))?;
        client.apply(&fields);
        let client = self.clients.update(&client).await?;

        info!(account_id = %id, client_id = %client.id, "Account holder updated");

        Ok(AccountView {
            account: view.account,
            holder_last_name: client.last_name,
            holder_first_name: client.first_name,
        })
    }

    /// Closes and soft-deletes the account.
    pub async fn delete(&self, id: &Uuid) -> Result<ClosedAccount, DomainError> {
        let mut account = self
            .accounts
            .find_by_id_including_deleted(id)
            .await?
            .ok_or_else(|| DomainError::AccountNotFound(id.to_string()))?;

        let now = Utc::now();
        account.close(now)?;
        self.accounts.close(&account).await?;

        info!(account_id = %account.id, account_number = %account.account_number, "Account closed");

        Ok(ClosedAccount {
            id: account.id,
            account_number: account.account_number,
            status: account.status,
            closed_at: now,
        })
    }
}

fn validate_opening(cmd: &CreateAccount) -> Result<(AccountType, Decimal, Currency), DomainError> {
    let mut errors = FieldErrors::new();

    let account_type = match cmd.account_type.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => {
            push_error(&mut errors, "", "account_type", "Le type de compte est obligatoire.");
            None
        }
        Some(raw) => {
            let parsed = AccountType::from_str(raw);
            if parsed.is_none() {
                push_error(&mut errors, "", "account_type", "Le type doit être : courant, epargne ou cheque.");
            }
            parsed
        }
    };

    let minimum = Decimal::from(MIN_INITIAL_BALANCE);
    let initial_balance = match cmd.initial_balance {
        None => {
            push_error(&mut errors, "", "initial_balance", "Le solde initial est obligatoire.");
            None
        }
        Some(amount) if amount < minimum => {
            push_error(
                &mut errors,
                "",
                "initial_balance",
                "Le solde initial doit être d'au moins 10 000 FCFA.",
            );
            None
        }
        Some(amount) => Some(amount),
    };

    let currency = match cmd.currency.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => {
            push_error(&mut errors, "", "currency", "La devise est obligatoire.");
            None
        }
        Some(raw) => {
            let parsed = Currency::from_str(raw);
            if parsed.is_none() {
                push_error(&mut errors, "", "currency", "La devise doit être FCFA ou XOF.");
            }
            parsed
        }
    };

    match (account_type, initial_balance, currency) {
        (Some(t), Some(b), Some(c)) if errors.is_empty() => Ok((t, b, c)),
        _ => Err(DomainError::validation("Les données fournies sont invalides.", errors)),
    }
}

/// Blank values are dropped, then the holder name fills the name fields not given explicitly.
fn merged_update_fields(cmd: &UpdateAccount) -> Result<ClientFields, DomainError> {
    let mut fields = cmd.client.normalized();
    let holder = cmd
        .holder
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if holder.is_none() && fields.is_empty() {
        return Err(DomainError::validation(
            "Au moins un champ de modification doit être fourni.",
            FieldErrors::new(),
        ));
    }

    if let Some(holder) = holder {
        let length = holder.chars().count();
        if !(HOLDER_MIN_LENGTH..=HOLDER_MAX_LENGTH).contains(&length) {
            return Err(DomainError::invalid_field(
                "titulaire",
                "Le titulaire doit contenir entre 2 et 255 caractères.",
            ));
        }

        let mut words = holder.split_whitespace();
        if fields.last_name.is_none() {
            fields.last_name = words.next().map(str::to_string);
        } else {
            words.next();
        }
        let rest = words.collect::<Vec<_>>().join(" ");
        if fields.first_name.is_none() && !rest.is_empty() {
            fields.first_name = Some(rest);
        }
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountStatus, Client, UniqueField};
    use crate::repositories::{MockAccountRepository, MockClientRepository};
    use crate::services::notifier::NoopNotifier;

    fn sample_client() -> Client {
        let fields = ClientFields {
            last_name: Some("Diallo".into()),
            first_name: Some("Amadou".into()),
            email: Some("amadou@example.com".into()),
            phone: Some("+221701234567".into()),
            national_id: Some("2123456789012".into()),
            address: Some("Plateau, Dakar".into()),
        }
        .checked("")
        .unwrap();
        Client::from_fields(&fields, "hash".into(), "123456".into()).unwrap()
    }

    fn sample_account(client_id: Uuid, status: AccountStatus) -> Account {
        let mut account = Account::open(
            "SN2401010101011234".into(),
            AccountType::Courant,
            Decimal::new(50_000, 0),
            Currency::Fcfa,
            client_id,
            Utc::now(),
        );
        account.status = status;
        account
    }

    fn service(accounts: MockAccountRepository, clients: MockClientRepository) -> AccountService {
        let clients: Arc<dyn ClientRepository> = Arc::new(clients);
        let resolver = ClientResolver::new(clients.clone(), Arc::new(NoopNotifier));
        AccountService::new(Arc::new(accounts), clients, resolver)
    }

    fn create_cmd(client_id: Uuid, balance: i64) -> CreateAccount {
        CreateAccount {
            account_type: Some("cheque".into()),
            initial_balance: Some(Decimal::from(balance)),
            currency: Some("FCFA".into()),
            client: ClientReference {
                id: Some(client_id.to_string()),
                fields: ClientFields::default(),
            },
        }
    }

    #[tokio::test]
    async fn balance_below_minimum_is_rejected_before_any_lookup() {
        let svc = service(MockAccountRepository::new(), MockClientRepository::new());

        let err = svc.create(create_cmd(Uuid::new_v4(), 9_999)).await.unwrap_err();

        assert!(err.field_errors().unwrap().contains_key("soldeInitial"));
    }

    #[tokio::test]
    async fn invalid_type_and_currency_are_reported_together() {
        let svc = service(MockAccountRepository::new(), MockClientRepository::new());
        let cmd = CreateAccount {
            account_type: Some("entreprise".into()),
            currency: Some("EUR".into()),
            initial_balance: None,
            ..create_cmd(Uuid::new_v4(), 0)
        };

        let err = svc.create(cmd).await.unwrap_err();
        let errors = err.field_errors().unwrap();

        assert!(errors.contains_key("type"));
        assert!(errors.contains_key("devise"));
        assert!(errors.contains_key("soldeInitial"));
    }

    #[tokio::test]
    async fn opens_active_account_for_existing_client() {
        let client = sample_client();
        let client_id = client.id;

        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_id()
            .returning(move |_| Ok(Some(client.clone())));

        let mut accounts = MockAccountRepository::new();
        accounts.expect_number_exists().returning(|_| Ok(false));
        accounts
            .expect_create()
            .withf(move |a| {
                a.client_id == client_id
                    && a.status == AccountStatus::Active
                    && a.account_type == AccountType::Courant
                    && a.balance == Decimal::from(10_000)
                    && a.account_number.starts_with("SN")
            })
            .returning(|a| Ok(a.clone()));

        let view = service(accounts, clients)
            .create(create_cmd(client_id, 10_000))
            .await
            .unwrap();

        assert_eq!(view.holder(), "Diallo Amadou");
        assert_eq!(view.account.currency, Currency::Fcfa);
        assert!(view.account.closed_at.is_none());
    }

    #[tokio::test]
    async fn get_hides_missing_accounts() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_view().returning(|_| Ok(None));

        let err = service(accounts, MockClientRepository::new())
            .get(&Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let svc = service(MockAccountRepository::new(), MockClientRepository::new());
        let cmd = UpdateAccount {
            holder: Some("  ".into()),
            client: ClientFields {
                email: Some("".into()),
                ..Default::default()
            },
        };

        let err = svc.update_client_info(&Uuid::new_v4(), cmd).await.unwrap_err();

        match err {
            DomainError::Validation { message, .. } => {
                assert_eq!(message, "Au moins un champ de modification doit être fourni.")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn email_only_update_changes_only_email() {
        let client = sample_client();
        let original = client.clone();
        let account = sample_account(client.id, AccountStatus::Active);
        let view = AccountView {
            account,
            holder_last_name: client.last_name.clone(),
            holder_first_name: client.first_name.clone(),
        };

        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_view()
            .returning(move |_| Ok(Some(view.clone())));

        let mut clients = MockClientRepository::new();
        let client_id = client.id;
        clients
            .expect_find_conflicts()
            .withf(move |fields, exclude| {
                *exclude == Some(client_id) && fields.email.as_deref() == Some("nouveau@example.com")
            })
            .returning(|_, _| Ok(vec![]));
        clients
            .expect_find_by_id()
            .returning(move |_| Ok(Some(client.clone())));
        clients
            .expect_update()
            .times(1)
            .withf(move |updated| {
                updated.email == "nouveau@example.com"
                    && updated.last_name == original.last_name
                    && updated.first_name == original.first_name
                    && updated.phone == original.phone
                    && updated.national_id == original.national_id
                    && updated.address == original.address
            })
            .returning(|c| Ok(c.clone()));

        let cmd = UpdateAccount {
            holder: None,
            client: ClientFields {
                email: Some("Nouveau@Example.com".into()),
                ..Default::default()
            },
        };
        let updated = service(accounts, clients)
            .update_client_info(&Uuid::new_v4(), cmd)
            .await
            .unwrap();

        assert_eq!(updated.holder(), "Diallo Amadou");
    }

    #[tokio::test]
    async fn update_reports_taken_phone() {
        let client = sample_client();
        let view = AccountView {
            account: sample_account(client.id, AccountStatus::Active),
            holder_last_name: client.last_name.clone(),
            holder_first_name: client.first_name.clone(),
        };

        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_view()
            .returning(move |_| Ok(Some(view.clone())));
        let mut clients = MockClientRepository::new();
        clients
            .expect_find_conflicts()
            .returning(|_, _| Ok(vec![UniqueField::Phone]));
        clients.expect_update().never();

        let cmd = UpdateAccount {
            holder: None,
            client: ClientFields {
                phone: Some("781112233".into()),
                ..Default::default()
            },
        };
        let err = service(accounts, clients)
            .update_client_info(&Uuid::new_v4(), cmd)
            .await
            .unwrap_err();

        assert!(err
            .field_errors()
            .unwrap()
            .contains_key("informationsClient.telephone"));
    }

    #[test]
    fn holder_fills_only_missing_name_fields() {
        let fields = merged_update_fields(&UpdateAccount {
            holder: Some("Ba Fatou Binetou".into()),
            client: ClientFields::default(),
        })
        .unwrap();
        assert_eq!(fields.last_name.as_deref(), Some("Ba"));
        assert_eq!(fields.first_name.as_deref(), Some("Fatou Binetou"));

        let fields = merged_update_fields(&UpdateAccount {
            holder: Some("Ba Fatou".into()),
            client: ClientFields {
                last_name: Some("Sarr".into()),
                ..Default::default()
            },
        })
        .unwrap();
        assert_eq!(fields.last_name.as_deref(), Some("Sarr"));
        assert_eq!(fields.first_name.as_deref(), Some("Fatou"));

        let fields = merged_update_fields(&UpdateAccount {
            holder: Some("Ba".into()),
            client: ClientFields::default(),
        })
        .unwrap();
        assert_eq!(fields.last_name.as_deref(), Some("Ba"));
        assert!(fields.first_name.is_none());
    }

    #[tokio::test]
    async fn deleting_active_account_closes_it() {
        let account = sample_account(Uuid::new_v4(), AccountStatus::Active);
        let id = account.id;

        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id_including_deleted()
            .returning(move |_| Ok(Some(account.clone())));
        accounts
            .expect_close()
            .times(1)
            .withf(|a| {
                a.status == AccountStatus::Closed && a.closed_at.is_some() && a.removed_at.is_some()
            })
            .returning(|_| Ok(()));

        let closed = service(accounts, MockClientRepository::new())
            .delete(&id)
            .await
            .unwrap();

        assert_eq!(closed.id, id);
        assert_eq!(closed.status, AccountStatus::Closed);
        assert!(closed.closed_at <= Utc::now());
    }

    #[tokio::test]
    async fn deleting_closed_account_is_a_conflict() {
        let account = sample_account(Uuid::new_v4(), AccountStatus::Closed);

        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id_including_deleted()
            .returning(move |_| Ok(Some(account.clone())));
        accounts.expect_close().never();

        let err = service(accounts, MockClientRepository::new())
            .delete(&Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::AccountAlreadyClosed(_)));
        assert_eq!(err.kind(), crate::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn deleting_unknown_account_is_not_found() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id_including_deleted()
            .returning(|_| Ok(None));

        let err = service(accounts, MockClientRepository::new())
            .delete(&Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AccountNotFound(_)));
    }
}
