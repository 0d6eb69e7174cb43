use crate::{
    Agreement, Application, ApiEnvelope, Campaign, ContentCreator, DataList, Invitation,
    LoginPayload, Message, ReviewStatus, UserRecord,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub const fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Path parameters live on the request struct but are `#[serde(skip)]`ed,
/// so only the remaining fields end up in the JSON body.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Skip decoding the response body; the endpoint's reply carries
    /// nothing the client uses.
    const DISCARD_RESPONSE: bool = false;
    /// The URL path, relative to the API base URL.
    fn path(&self) -> String;
    /// Query parameters, unencoded. The HTTP layer percent-encodes them.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = ApiEnvelope<LoginPayload>;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/Auth/login".into()
    }
}

/// Registration is sent as `multipart/form-data`, so it is not an `ApiRequest`.
pub const REGISTER_PATH: &str = "/Auth/register";

/// Profile updates are `multipart/form-data` as well (`PUT`).
pub fn update_user_path(id: i64) -> String {
    format!("/Users/{id}")
}

// =========================================================
// Users
// =========================================================

#[derive(Debug, Serialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = UserRecord;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/Users/me".into()
    }
}

#[derive(Debug, Serialize)]
pub struct GetCreatorRequest {
    #[serde(skip)]
    pub id: i64,
}

impl ApiRequest for GetCreatorRequest {
    type Response = ContentCreator;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/Users/{}", self.id)
    }
}

#[derive(Debug, Serialize)]
pub struct ListCreatorsRequest;

impl ApiRequest for ListCreatorsRequest {
    type Response = DataList<ContentCreator>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/Users/contentcreators".into()
    }
}

/// Creator search filters, also persisted between visits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorFilter {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub min_followers: Option<u64>,
    #[serde(default)]
    pub max_followers: Option<u64>,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
}

impl CreatorFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Query pairs in the order the search endpoint documents, empty
    /// fields omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.category.is_empty() {
            pairs.push(("category", self.category.clone()));
        }
        if let Some(v) = self.min_followers {
            pairs.push(("minFollowers", v.to_string()));
        }
        if let Some(v) = self.max_followers {
            pairs.push(("maxFollowers", v.to_string()));
        }
        if let Some(v) = self.min_score {
            pairs.push(("minScore", v.to_string()));
        }
        if let Some(v) = self.max_score {
            pairs.push(("maxScore", v.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Serialize)]
pub struct SearchCreatorsRequest {
    #[serde(skip)]
    pub filter: CreatorFilter,
}

impl ApiRequest for SearchCreatorsRequest {
    type Response = Vec<ContentCreator>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/Users/search".into()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        self.filter.query_pairs()
    }
}

// =========================================================
// Campaigns
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListCampaignsRequest;

impl ApiRequest for ListCampaignsRequest {
    type Response = Vec<Campaign>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/Campaigns/all".into()
    }
}

#[derive(Debug, Serialize)]
pub struct MyCampaignsRequest;

impl ApiRequest for MyCampaignsRequest {
    type Response = DataList<Campaign>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/Campaigns/my-campaigns".into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub max_capacity: u32,
}

impl ApiRequest for CreateCampaignRequest {
    type Response = Campaign;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/Campaigns".into()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApplyToCampaignRequest {
    #[serde(skip)]
    pub campaign_id: i64,
}

impl ApiRequest for ApplyToCampaignRequest {
    type Response = ApplyResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/Campaigns/{}/apply", self.campaign_id)
    }
}

#[derive(Debug, Serialize)]
pub struct MyApplicationsRequest;

impl ApiRequest for MyApplicationsRequest {
    type Response = Vec<Application>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/Campaigns/my-applications".into()
    }
}

#[derive(Debug, Serialize)]
pub struct CampaignApplicationsRequest {
    #[serde(skip)]
    pub campaign_id: i64,
}

impl ApiRequest for CampaignApplicationsRequest {
    type Response = Vec<Application>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/Campaigns/{}/applications", self.campaign_id)
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateApplicationStatusRequest {
    #[serde(skip)]
    pub campaign_id: i64,
    #[serde(skip)]
    pub application_id: i64,
    pub status: ReviewStatus,
}

impl ApiRequest for UpdateApplicationStatusRequest {
    type Response = ();
    const DISCARD_RESPONSE: bool = true;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!(
            "/Campaigns/{}/applications/{}/status",
            self.campaign_id, self.application_id
        )
    }
}

#[derive(Debug, Serialize)]
pub struct InviteCreatorRequest {
    #[serde(skip)]
    pub campaign_id: i64,
    #[serde(skip)]
    pub creator_id: i64,
}

impl ApiRequest for InviteCreatorRequest {
    type Response = ();
    const DISCARD_RESPONSE: bool = true;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/Campaigns/{}/invite/{}", self.campaign_id, self.creator_id)
    }
}

#[derive(Debug, Serialize)]
pub struct MyInvitationsRequest;

impl ApiRequest for MyInvitationsRequest {
    type Response = Vec<Invitation>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/Campaigns/my-invitations".into()
    }
}

#[derive(Debug, Serialize)]
pub struct CampaignInvitationsRequest {
    #[serde(skip)]
    pub campaign_id: i64,
}

impl ApiRequest for CampaignInvitationsRequest {
    type Response = Vec<Invitation>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/Campaigns/{}/invitations", self.campaign_id)
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateInvitationStatusRequest {
    #[serde(skip)]
    pub invitation_id: i64,
    pub status: ReviewStatus,
}

impl ApiRequest for UpdateInvitationStatusRequest {
    type Response = ();
    const DISCARD_RESPONSE: bool = true;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/Campaigns/invitations/{}/status", self.invitation_id)
    }
}

#[derive(Debug, Serialize)]
pub struct MyAgreementsRequest;

impl ApiRequest for MyAgreementsRequest {
    type Response = Vec<Agreement>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/Campaigns/my-agreements".into()
    }
}

// =========================================================
// Messages
// =========================================================

/// Conversation history with one counterpart.
#[derive(Debug, Serialize)]
pub struct ListMessagesRequest {
    #[serde(skip)]
    pub user_id: i64,
}

impl ApiRequest for ListMessagesRequest {
    type Response = Vec<Message>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/messages/{}", self.user_id)
    }
}

impl ApiRequest for Message {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;
    const DISCARD_RESPONSE: bool = true;
    fn path(&self) -> String {
        "/messages".into()
    }
}
