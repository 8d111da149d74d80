//! Account payloads and resources

use bank_core::domain::{AccountView, ClientFields, ClientReference, ClosedAccount, ListAccountsParams};
use bank_core::services::{CreateAccount, UpdateAccount};
use bank_shared::Page;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::PaginationLinks;

const RESOURCE_VERSION: u32 = 1;

/// Client block of a creation payload: an existing id or the fields of a new client.
#[derive(Debug, Default, Deserialize)]
pub struct ClientPayload {
    pub id: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub nci: Option<String>,
    pub adresse: Option<String>,
}

impl From<ClientPayload> for ClientFields {
    fn from(p: ClientPayload) -> Self {
        ClientFields {
            last_name: p.nom,
            first_name: p.prenom,
            email: p.email,
            phone: p.telephone,
            national_id: p.nci,
            address: p.adresse,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub solde_initial: Option<Decimal>,
    pub devise: Option<String>,
    #[serde(default)]
    pub client: ClientPayload,
}

impl From<CreateAccountRequest> for CreateAccount {
    fn from(req: CreateAccountRequest) -> Self {
        let id = req.client.id.clone();
        CreateAccount {
            account_type: req.account_type,
            initial_balance: req.solde_initial,
            currency: req.devise,
            client: ClientReference {
                id,
                fields: req.client.into(),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientInfoPayload {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub nci: Option<String>,
    pub adresse: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub titulaire: Option<String>,
    #[serde(default)]
    pub informations_client: ClientInfoPayload,
}

impl From<UpdateAccountRequest> for UpdateAccount {
    fn from(req: UpdateAccountRequest) -> Self {
        let info = req.informations_client;
        UpdateAccount {
            holder: req.titulaire,
            client: ClientFields {
                last_name: info.nom,
                first_name: info.prenom,
                email: info.email,
                phone: info.telephone,
                national_id: info.nci,
                address: info.adresse,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMetadata {
    pub derniere_modification: DateTime<Utc>,
    pub version: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResource {
    pub id: Uuid,
    pub numero_compte: String,
    pub titulaire: String,
    #[serde(rename = "type")]
    pub account_type: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub solde: Decimal,
    pub devise: &'static str,
    pub date_creation: DateTime<Utc>,
    pub statut: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motif_blocage: Option<&'static str>,
    pub metadata: AccountMetadata,
}

impl From<AccountView> for AccountResource {
    fn from(view: AccountView) -> Self {
        let titulaire = view.holder();
        let account = view.account;
        Self {
            id: account.id,
            titulaire,
            account_type: account.account_type.as_str(),
            solde: account.balance,
            devise: account.currency.as_str(),
            date_creation: account.opened_at,
            statut: account.status.as_str(),
            motif_blocage: account.block_reason(),
            metadata: AccountMetadata {
                derniere_modification: account.last_modified(),
                version: RESOURCE_VERSION,
            },
            numero_compte: account.account_number,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedAccountResource {
    pub id: Uuid,
    pub numero_compte: String,
    pub statut: &'static str,
    pub date_fermeture: DateTime<Utc>,
}

impl From<ClosedAccount> for ClosedAccountResource {
    fn from(closed: ClosedAccount) -> Self {
        Self {
            id: closed.id,
            statut: closed.status.as_str(),
            date_fermeture: closed.closed_at,
            numero_compte: closed.account_number,
        }
    }
}

/// Relative links to neighbouring pages, keeping every filter of the request.
pub fn pagination_links<T>(path: &str, params: &ListAccountsParams, page: &Page<T>) -> PaginationLinks {
    let link = |number: u32| {
        let params = ListAccountsParams {
            page: Some(i64::from(number)),
            limit: Some(i64::from(page.per_page)),
            ..params.clone()
        };
        match serde_urlencoded::to_string(&params) {
            Ok(query) => format!("{}?{}", path, query),
            Err(_) => path.to_string(),
        }
    };

    PaginationLinks {
        self_link: link(page.current_page),
        next: page.has_next().then(|| link(page.current_page + 1)),
        first: link(1),
        last: link(page.last_page()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_core::domain::{Account, AccountStatus, AccountType, Currency};
    use bank_shared::Pagination;
    use serde_json::json;

    fn view(status: AccountStatus) -> AccountView {
        let mut account = Account::open(
            "SN2403091205074821".into(),
            AccountType::Epargne,
            Decimal::new(1_250_050, 2),
            Currency::Xof,
            Uuid::new_v4(),
            Utc::now(),
        );
        account.status = status;
        AccountView {
            account,
            holder_last_name: "Sy".into(),
            holder_first_name: "Cheikh".into(),
        }
    }

    #[test]
    fn resource_uses_wire_names() {
        let value = serde_json::to_value(AccountResource::from(view(AccountStatus::Active))).unwrap();

        assert_eq!(value["numeroCompte"], "SN2403091205074821");
        assert_eq!(value["titulaire"], "Sy Cheikh");
        assert_eq!(value["type"], "epargne");
        assert_eq!(value["solde"], json!(12500.5));
        assert_eq!(value["devise"], "XOF");
        assert_eq!(value["statut"], "actif");
        assert_eq!(value["metadata"]["version"], 1);
        assert!(value.get("motifBlocage").is_none());
    }

    #[test]
    fn blocked_resource_has_reason() {
        let value = serde_json::to_value(AccountResource::from(view(AccountStatus::Blocked))).unwrap();
        assert_eq!(value["motifBlocage"], "Inactivité de 30+ jours");
    }

    #[test]
    fn create_request_maps_french_fields() {
        let req: CreateAccountRequest = serde_json::from_value(json!({
            "type": "cheque",
            "soldeInitial": 500000,
            "devise": "FCFA",
            "client": { "nom": "Diop", "telephone": "+221771234567", "nci": "1234567890123" }
        }))
        .unwrap();
        let cmd = CreateAccount::from(req);

        assert_eq!(cmd.account_type.as_deref(), Some("cheque"));
        assert_eq!(cmd.initial_balance, Some(Decimal::from(500_000)));
        assert_eq!(cmd.client.fields.last_name.as_deref(), Some("Diop"));
        assert_eq!(cmd.client.fields.national_id.as_deref(), Some("1234567890123"));
        assert!(cmd.client.id.is_none());
    }

    #[test]
    fn update_request_maps_nested_client_info() {
        let req: UpdateAccountRequest = serde_json::from_value(json!({
            "titulaire": "Amadou Diallo Junior",
            "informationsClient": { "email": "a@b.sn" }
        }))
        .unwrap();
        let cmd = UpdateAccount::from(req);

        assert_eq!(cmd.holder.as_deref(), Some("Amadou Diallo Junior"));
        assert_eq!(cmd.client.email.as_deref(), Some("a@b.sn"));
        assert!(cmd.client.phone.is_none());
    }

    #[test]
    fn links_keep_filters() {
        let params = ListAccountsParams {
            account_type: Some("epargne".into()),
            search: Some("Sy".into()),
            ..Default::default()
        };
        let page: Page<()> = Page::new(vec![], Pagination::new(Some(2), Some(20)), 75);

        let links = pagination_links("/v1/comptes", &params, &page);

        assert_eq!(links.self_link, "/v1/comptes?page=2&limit=20&type=epargne&search=Sy");
        assert_eq!(links.next.as_deref(), Some("/v1/comptes?page=3&limit=20&type=epargne&search=Sy"));
        assert_eq!(links.first, "/v1/comptes?page=1&limit=20&type=epargne&search=Sy");
        assert_eq!(links.last, "/v1/comptes?page=4&limit=20&type=epargne&search=Sy");
    }

    #[test]
    fn last_page_has_no_next_link() {
        let page: Page<()> = Page::new(vec![], Pagination::new(Some(1), Some(10)), 3);
        let links = pagination_links("/v1/comptes", &ListAccountsParams::default(), &page);
        assert!(links.next.is_none());
        assert_eq!(links.last, "/v1/comptes?page=1&limit=10");
    }
}
