//! MCP tool handlers for the address server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::domain::PhoneNumber;
use crate::error::AddressError;
use crate::geocoding::Coordinates;
use crate::models::{AddressDetails, AddressLabel};
use crate::search::SearchOutcome;
use crate::services::AddressService;
use crate::validation;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server that exposes saved-address management tools.
#[derive(Clone)]
pub struct AddressMcpServer {
    address_service: Arc<dyn AddressService>,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for AddressMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "address-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Manage saved delivery addresses: validate the contact phone, search a location, draft and save an address, then select the one to deliver to.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PhoneParams {
    phone: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListAddressesParams {
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchLocationsParams {
    query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ReverseGeocodeParams {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct DraftAddressParams {
    phone: String,
    /// Position in the most recent search_locations or reverse_geocode result
    location_index: usize,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    custom_label: Option<String>,
    #[serde(default)]
    unit: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AddressFieldsParams {
    phone: String,
    /// Home, Work or Other
    #[serde(default)]
    label: Option<String>,
    /// Free-text label when label is Other
    #[serde(default)]
    custom_label: Option<String>,
    unit: String,
    line1: String,
    #[serde(default)]
    line2: Option<String>,
    city: String,
    region: String,
    postal_code: String,
}

impl AddressFieldsParams {
    fn into_details(self) -> Result<AddressDetails, AddressError> {
        let label = match self.label {
            Some(label) => AddressLabel::from_parts(&label, self.custom_label)?,
            None => AddressLabel::default(),
        };

        Ok(AddressDetails {
            label,
            phone: self.phone,
            unit: self.unit,
            line1: self.line1,
            line2: self.line2.unwrap_or_default(),
            city: self.city,
            region: self.region,
            postal_code: self.postal_code,
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateAddressParams {
    id: String,
    #[serde(flatten)]
    fields: AddressFieldsParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AddressIdParams {
    id: String,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn json_result(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Incomplete drafts go back to the caller for correction rather than failing the call.
fn rejected_draft(fields: Vec<String>, draft: &AddressDetails) -> Result<CallToolResult, McpError> {
    json_result(&serde_json::json!({
        "saved": false,
        "missing_fields": fields,
        "draft": draft,
    }))
}

#[tool_router]
impl AddressMcpServer {
    /// Create a new address MCP server.
    pub fn new(address_service: Arc<dyn AddressService>) -> Self {
        Self {
            address_service,
            tool_router: Self::tool_router(),
        }
    }

    /// Check whether a contact phone number is usable.
    #[tool(description = "Check whether a contact phone number is a valid 10-digit mobile number")]
    async fn validate_phone(
        &self,
        params: Parameters<PhoneParams>,
    ) -> Result<CallToolResult, McpError> {
        let phone = params.0.phone;
        let digits = PhoneNumber::digits_only(&phone);

        json_result(&serde_json::json!({
            "phone": phone,
            "valid": validation::is_valid_phone(&phone),
            "digits": digits,
            "digits_valid": validation::is_valid_phone(&digits),
        }))
    }

    /// List saved addresses.
    #[tool(
        description = "List saved delivery addresses. When a phone is given, only addresses for that contact number are returned."
    )]
    async fn list_addresses(
        &self,
        params: Parameters<ListAddressesParams>,
    ) -> Result<CallToolResult, McpError> {
        let addresses = match params.0.phone {
            Some(phone) => self
                .address_service
                .addresses_for_phone(&phone)
                .await
                .map_err(to_mcp_error)?,
            None => self.address_service.list_addresses().await,
        };

        json_result(&serde_json::json!({
            "count": addresses.len(),
            "addresses": addresses,
        }))
    }

    /// Get the currently selected delivery address.
    #[tool(description = "Get the address currently selected for delivery, if any")]
    async fn get_selected_address(&self) -> Result<CallToolResult, McpError> {
        let selected = self.address_service.selected_address().await;
        json_result(&serde_json::json!({ "selected": selected }))
    }

    /// Search for a location by free text.
    #[tool(
        description = "Search for a location by free text. Returns candidates with normalized address fields; pass a candidate's index to draft_address."
    )]
    async fn search_locations(
        &self,
        params: Parameters<SearchLocationsParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = params.0.query;
        let outcome = self.address_service.search_locations(&query).await;

        let response = match outcome {
            SearchOutcome::Results(results) => serde_json::json!({
                "query": query,
                "superseded": false,
                "result_count": results.len(),
                "results": results.iter().enumerate().map(|(index, candidate)| {
                    serde_json::json!({
                        "index": index,
                        "full_address": candidate.full_address,
                        "fields": candidate.fragment,
                        "coordinates": candidate.coordinates,
                    })
                }).collect::<Vec<_>>(),
            }),
            SearchOutcome::Superseded => serde_json::json!({
                "query": query,
                "superseded": true,
                "result_count": 0,
                "results": [],
            }),
        };

        json_result(&response)
    }

    /// Resolve coordinates to candidate locations.
    #[tool(
        description = "Find the address at a map coordinate. Results replace the candidates used by draft_address."
    )]
    async fn reverse_geocode(
        &self,
        params: Parameters<ReverseGeocodeParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let results = self
            .address_service
            .reverse_geocode(Coordinates::new(params.lat, params.lon))
            .await
            .map_err(to_mcp_error)?;

        json_result(&serde_json::json!({
            "result_count": results.len(),
            "results": results.iter().enumerate().map(|(index, candidate)| {
                serde_json::json!({
                    "index": index,
                    "full_address": candidate.full_address,
                    "fields": candidate.fragment,
                })
            }).collect::<Vec<_>>(),
        }))
    }

    /// Prefill an address draft from a search candidate.
    #[tool(
        description = "Prefill an address draft for a phone number from a location returned by the last search. Reports which required fields still need to be filled in."
    )]
    async fn draft_address(
        &self,
        params: Parameters<DraftAddressParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let mut base = AddressDetails::default();
        if let Some(label) = params.label {
            base.label = AddressLabel::from_parts(&label, params.custom_label)
                .map_err(to_mcp_error)?;
        }
        base.unit = params.unit.unwrap_or_default();

        let draft = self
            .address_service
            .draft_from_location(&params.phone, params.location_index, Some(base))
            .await
            .map_err(to_mcp_error)?;

        json_result(&serde_json::json!({
            "draft": draft,
            "missing_fields": validation::missing_fields(&draft),
            "complete": validation::is_complete_address(&draft),
        }))
    }

    /// Save a new address.
    #[tool(
        description = "Save a new delivery address. Requires phone, unit, line1, city, region and postal_code; incomplete drafts are returned with the missing fields."
    )]
    async fn create_address(
        &self,
        params: Parameters<AddressFieldsParams>,
    ) -> Result<CallToolResult, McpError> {
        let draft = params.0.into_details().map_err(to_mcp_error)?;

        match self.address_service.create_address(draft.clone()).await {
            Ok(record) => json_result(&serde_json::json!({ "saved": true, "address": record })),
            Err(AddressError::ValidationFailed { fields }) => rejected_draft(fields, &draft),
            Err(e) => Err(to_mcp_error(e)),
        }
    }

    /// Replace the fields of a saved address.
    #[tool(
        description = "Edit a saved address by id. Keeps its position and selection; incomplete edits are returned with the missing fields."
    )]
    async fn update_address(
        &self,
        params: Parameters<UpdateAddressParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let details = params.fields.into_details().map_err(to_mcp_error)?;

        match self
            .address_service
            .update_address(&params.id, details.clone())
            .await
        {
            Ok(record) => json_result(&serde_json::json!({ "saved": true, "address": record })),
            Err(AddressError::ValidationFailed { fields }) => rejected_draft(fields, &details),
            Err(e) => Err(to_mcp_error(e)),
        }
    }

    /// Delete a saved address.
    #[tool(description = "Delete a saved address by id. Deleting an unknown id does nothing.")]
    async fn delete_address(
        &self,
        params: Parameters<AddressIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let removed = self
            .address_service
            .delete_address(&params.0.id)
            .await
            .map_err(to_mcp_error)?;

        json_result(&serde_json::json!({
            "deleted": removed.is_some(),
            "address": removed,
        }))
    }

    /// Select the active delivery address.
    #[tool(description = "Select the address to deliver to. Any previously selected address is unselected.")]
    async fn select_address(
        &self,
        params: Parameters<AddressIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let record = self
            .address_service
            .select_address(&params.0.id)
            .await
            .map_err(to_mcp_error)?;

        json_result(&serde_json::json!({ "selected": record }))
    }
}
