//! Request-shape API for suggestion and equivalence calls.
//!
//! # Responsibility
//! - Map raw query parameters onto core use-cases.
//! - Return a status code plus JSON body matching the public endpoint shapes.
//!
//! # Invariants
//! - Functions never panic; every failure becomes an `ApiResponse`.
//! - Error bodies carry a user-facing message and a stable code, never raw
//!   storage error text.
//! - Missing parameters are rejected before the database is opened.

use equivale_core::db::open_db;
use equivale_core::{
    check_catalog, core_version as core_version_inner, init_logging as init_logging_inner,
    parse_quantity, Catalog, EngineConfig, EngineError, EquivalenceService,
    FoodGroup, FoodRecord, FoodStore, PartitionHealth, SqliteFoodStore, Suggester,
};
use log::{error, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Status code plus JSON body, ready for any transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self {
                status: STATUS_OK,
                body,
            },
            Err(err) => {
                error!("event=api_encode module=api status=error error={err}");
                Self::failure(
                    STATUS_INTERNAL_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        }
    }

    fn failure(status: u16, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into(), "code": code }),
        }
    }

    fn from_engine_error(err: &EngineError) -> Self {
        let status = status_for(err);
        if status == STATUS_INTERNAL_ERROR {
            error!("event=api_request module=api status=error code={} error={}", err.code(), err);
        }
        Self::failure(status, err.code(), err.user_message())
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Maps an engine failure to its HTTP-equivalent status code.
pub fn status_for(err: &EngineError) -> u16 {
    match err {
        EngineError::InvalidInput(_) => STATUS_BAD_REQUEST,
        EngineError::NotFound(_) => STATUS_NOT_FOUND,
        EngineError::MissingCaloricData { .. } | EngineError::DataSource { .. } => {
            STATUS_INTERNAL_ERROR
        }
    }
}

/// Raw equivalence query parameters, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquivalenceParams {
    pub base_food: Option<String>,
    pub base_quantity: Option<String>,
    pub substitute_food: Option<String>,
}

impl EquivalenceParams {
    pub fn new(
        base_food: impl Into<String>,
        base_quantity: impl Into<String>,
        substitute_food: impl Into<String>,
    ) -> Self {
        Self {
            base_food: Some(base_food.into()),
            base_quantity: Some(base_quantity.into()),
            substitute_food: Some(substitute_food.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionsBody {
    pub sugestoes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquivalenceBody {
    /// Food names and quantity echo the request text.
    pub base_food: String,
    pub base_quantity: String,
    pub substitute_food: String,
    /// Two-decimal text, e.g. `"107.88"`.
    pub equivalent_quantity: String,
    pub base_group: String,
    pub substitute_group: String,
    /// Canonical record names the inputs resolved to.
    pub base_match: String,
    pub substitute_match: String,
    pub groups_differ: bool,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupListingBody {
    pub group: String,
    pub label: String,
    pub foods: Vec<FoodRecord>,
}

/// API bound to one open connection and catalog.
pub struct EquivaleApi<'conn> {
    store: SqliteFoodStore<'conn>,
    catalog: Catalog,
    suggestion_limit: u32,
}

impl<'conn> EquivaleApi<'conn> {
    pub fn new(conn: &'conn Connection, catalog: Catalog) -> Self {
        Self {
            store: SqliteFoodStore::new(conn),
            catalog,
            suggestion_limit: equivale_core::DEFAULT_SUGGESTION_LIMIT,
        }
    }

    pub fn with_suggestion_limit(mut self, limit: u32) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// `GET suggestions?query=...`
    pub fn suggestions(&self, query: Option<&str>) -> ApiResponse {
        let Some(query) = non_blank(query) else {
            return missing_query();
        };

        let suggester =
            Suggester::new(&self.store, &self.catalog).with_limit(self.suggestion_limit);
        match suggester.suggest(query) {
            Ok(names) if names.is_empty() => {
                ApiResponse::failure(STATUS_NOT_FOUND, "not_found", "No food found")
            }
            Ok(names) => ApiResponse::ok(SuggestionsBody { sugestoes: names }),
            Err(err) => ApiResponse::from_engine_error(&err),
        }
    }

    /// `GET equivalence?baseFood=...&baseQuantity=...&substituteFood=...`
    pub fn equivalence(&self, params: &EquivalenceParams) -> ApiResponse {
        let request = match EquivalenceRequest::from_params(params) {
            Ok(request) => request,
            Err(response) => return response,
        };

        let service = EquivalenceService::new(&self.store, &self.catalog);
        match service.equivalence(request.base_food, request.quantity, request.substitute_food) {
            Ok(result) => ApiResponse::ok(EquivalenceBody {
                base_food: request.base_food.to_string(),
                base_quantity: request.base_quantity.to_string(),
                substitute_food: request.substitute_food.to_string(),
                equivalent_quantity: result.display_quantity(),
                base_group: result.base.group.table().to_string(),
                substitute_group: result.substitute.group.table().to_string(),
                base_match: result.base.name().to_string(),
                substitute_match: result.substitute.name().to_string(),
                groups_differ: result.groups_differ,
                summary: result.summary(),
                warning: result.group_warning(),
            }),
            Err(err) => ApiResponse::from_engine_error(&err),
        }
    }

    /// Lists every record of one group, by table id or label.
    pub fn list_group(&self, group: Option<&str>) -> ApiResponse {
        let group = match parse_group(group) {
            Ok(group) => group,
            Err(response) => return response,
        };

        match self.store.list_all(group) {
            Ok(foods) => ApiResponse::ok(GroupListingBody {
                group: group.table().to_string(),
                label: group.label().to_string(),
                foods,
            }),
            Err(source) => ApiResponse::from_engine_error(&EngineError::DataSource { group, source }),
        }
    }

    /// Per-partition reachability report.
    pub fn catalog_health(&self) -> Vec<PartitionHealth> {
        check_catalog(&self.store, &self.catalog)
    }
}

pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging; returns an empty string on success and the
/// error message otherwise.
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Suggestions against the configured database.
pub fn suggestions(query: Option<String>) -> ApiResponse {
    if non_blank(query.as_deref()).is_none() {
        return missing_query();
    }
    with_api(|api| api.suggestions(query.as_deref()))
}

/// Equivalence against the configured database.
pub fn equivalence(params: EquivalenceParams) -> ApiResponse {
    if let Err(response) = EquivalenceRequest::from_params(&params) {
        return response;
    }
    with_api(|api| api.equivalence(&params))
}

/// Group listing against the configured database.
pub fn list_group(group: Option<String>) -> ApiResponse {
    if let Err(response) = parse_group(group.as_deref()) {
        return response;
    }
    with_api(|api| api.list_group(group.as_deref()))
}

/// Equivalence parameters after presence and quantity checks.
struct EquivalenceRequest<'p> {
    base_food: &'p str,
    base_quantity: &'p str,
    substitute_food: &'p str,
    quantity: f64,
}

impl<'p> EquivalenceRequest<'p> {
    fn from_params(params: &'p EquivalenceParams) -> Result<Self, ApiResponse> {
        let (Some(base_food), Some(base_quantity), Some(substitute_food)) = (
            non_blank(params.base_food.as_deref()),
            non_blank(params.base_quantity.as_deref()),
            non_blank(params.substitute_food.as_deref()),
        ) else {
            return Err(ApiResponse::failure(
                STATUS_BAD_REQUEST,
                "invalid_input",
                "baseFood, baseQuantity and substituteFood are required",
            ));
        };
        let quantity =
            parse_quantity(base_quantity).map_err(|err| ApiResponse::from_engine_error(&err))?;

        Ok(Self {
            base_food,
            base_quantity,
            substitute_food,
            quantity,
        })
    }
}

fn parse_group(raw: Option<&str>) -> Result<FoodGroup, ApiResponse> {
    let Some(raw) = non_blank(raw) else {
        return Err(ApiResponse::failure(
            STATUS_BAD_REQUEST,
            "invalid_input",
            "The 'group' parameter is required",
        ));
    };
    raw.parse::<FoodGroup>()
        .map_err(|err| ApiResponse::failure(STATUS_BAD_REQUEST, "invalid_input", err.to_string()))
}

fn missing_query() -> ApiResponse {
    ApiResponse::failure(
        STATUS_BAD_REQUEST,
        "invalid_input",
        "The 'query' parameter is required",
    )
}

fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(|| {
        let config = EngineConfig::from_env();
        if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
            if let Err(err) = init_logging_inner(&config.log_level, log_dir) {
                // Only reaches a logger the host installed itself.
                warn!("event=api_logging module=api status=disabled error={err}");
            }
        }
        config
    })
}

fn with_api(f: impl FnOnce(&EquivaleApi<'_>) -> ApiResponse) -> ApiResponse {
    let config = config();
    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=api_db_open module=api status=error error={err}");
            return ApiResponse::failure(
                STATUS_INTERNAL_ERROR,
                "data_source_failure",
                "The food database is unavailable right now, please try again",
            );
        }
    };
    let api = EquivaleApi::new(&conn, Catalog::standard())
        .with_suggestion_limit(config.suggestion_limit);
    f(&api)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
