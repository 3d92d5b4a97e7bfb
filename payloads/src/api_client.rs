use jiff::civil::Date;
use reqwest::StatusCode;
use serde::Serialize;

use crate::{
    AvailabilityWindow, BookingId, NotificationId, ProviderProfile,
    UserId, requests, responses,
};

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the backend.
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        self.inner_client
            .post(self.format_url(path))
            .json(body)
            .send()
            .await
    }

    async fn patch(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        self.inner_client
            .patch(self.format_url(path))
            .json(body)
            .send()
            .await
    }

    async fn empty_post(&self, path: &str) -> ReqwestResult {
        self.inner_client.post(self.format_url(path)).send().await
    }

    async fn empty_get(&self, path: &str) -> ReqwestResult {
        self.inner_client.get(self.format_url(path)).send().await
    }
}

/// Methods on the backend API
impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self.empty_get("health_check").await?;
        ok_empty(response).await
    }

    pub async fn create_account(
        &self,
        details: &requests::CreateAccount,
    ) -> Result<responses::UserProfile, ClientError> {
        let response = self.post("create_account", details).await?;
        ok_body(response).await
    }

    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Result<(), ClientError> {
        let response = self.post("login", details).await?;
        ok_empty(response).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.empty_post("logout").await?;
        ok_empty(response).await
    }

    /// Check if the user is logged in.
    pub async fn login_check(&self) -> Result<bool, ClientError> {
        let response = self.empty_post("login_check").await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::UNAUTHORIZED => Ok(false),
            _ => Err(ClientError::APIError(
                response.status(),
                response.text().await?,
            )),
        }
    }

    pub async fn user_profile(
        &self,
    ) -> Result<responses::UserProfile, ClientError> {
        let response = self.empty_get("user_profile").await?;
        ok_body(response).await
    }

    /// Admin-only listing of every account.
    pub async fn list_users(
        &self,
    ) -> Result<Vec<responses::UserProfile>, ClientError> {
        let response = self.empty_get("users").await?;
        ok_body(response).await
    }

    pub async fn create_provider_profile(
        &self,
        details: &ProviderProfile,
    ) -> Result<responses::ProviderProfile, ClientError> {
        let response = self.post("create_provider_profile", details).await?;
        ok_body(response).await
    }

    pub async fn update_provider_profile(
        &self,
        details: &ProviderProfile,
    ) -> Result<responses::ProviderProfile, ClientError> {
        let response = self.post("update_provider_profile", details).await?;
        ok_body(response).await
    }

    /// Public read of a provider's profile, keyed by the provider's user id.
    pub async fn get_provider_profile(
        &self,
        provider_id: &UserId,
    ) -> Result<responses::ProviderProfile, ClientError> {
        let response = self
            .empty_get(&format!("provider_profile/{provider_id}"))
            .await?;
        ok_body(response).await
    }

    pub async fn create_service(
        &self,
        details: &requests::CreateService,
    ) -> Result<responses::Service, ClientError> {
        let response = self.post("create_service", details).await?;
        ok_body(response).await
    }

    pub async fn list_services(
        &self,
        provider_id: &UserId,
    ) -> Result<Vec<responses::Service>, ClientError> {
        let response =
            self.empty_get(&format!("services/{provider_id}")).await?;
        ok_body(response).await
    }

    pub async fn set_availability(
        &self,
        details: &requests::SetAvailability,
    ) -> Result<(), ClientError> {
        let response = self.post("set_availability", details).await?;
        ok_empty(response).await
    }

    pub async fn get_availability(
        &self,
        provider_id: &UserId,
    ) -> Result<Vec<AvailabilityWindow>, ClientError> {
        let response = self
            .empty_get(&format!("availability/{provider_id}"))
            .await?;
        ok_body(response).await
    }

    pub async fn add_blocked_date(
        &self,
        details: &requests::AddBlockedDate,
    ) -> Result<(), ClientError> {
        let response = self.post("add_blocked_date", details).await?;
        ok_empty(response).await
    }

    pub async fn remove_blocked_date(
        &self,
        details: &requests::RemoveBlockedDate,
    ) -> Result<(), ClientError> {
        let response = self.post("remove_blocked_date", details).await?;
        ok_empty(response).await
    }

    pub async fn list_blocked_dates(
        &self,
        provider_id: &UserId,
    ) -> Result<Vec<Date>, ClientError> {
        let response = self
            .empty_get(&format!("blocked_dates/{provider_id}"))
            .await?;
        ok_body(response).await
    }

    pub async fn create_booking(
        &self,
        details: &requests::CreateBooking,
    ) -> Result<responses::Booking, ClientError> {
        let response = self.post("bookings", details).await?;
        ok_body(response).await
    }

    /// Role-filtered listing: customers and providers see bookings where
    /// they are a party, admins see everything.
    pub async fn list_bookings(
        &self,
    ) -> Result<Vec<responses::Booking>, ClientError> {
        let response = self.empty_get("bookings").await?;
        ok_body(response).await
    }

    pub async fn get_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<responses::Booking, ClientError> {
        let response =
            self.empty_get(&format!("bookings/{booking_id}")).await?;
        ok_body(response).await
    }

    pub async fn update_booking_status(
        &self,
        booking_id: &BookingId,
        details: &requests::UpdateBookingStatus,
    ) -> Result<responses::Booking, ClientError> {
        let response = self
            .patch(&format!("bookings/{booking_id}"), details)
            .await?;
        ok_body(response).await
    }

    pub async fn record_payment_status(
        &self,
        details: &requests::RecordPaymentStatus,
    ) -> Result<responses::Booking, ClientError> {
        let response = self.post("record_payment_status", details).await?;
        ok_body(response).await
    }

    pub async fn create_review(
        &self,
        details: &requests::CreateReview,
    ) -> Result<responses::Review, ClientError> {
        let response = self.post("reviews", details).await?;
        ok_body(response).await
    }

    pub async fn list_provider_reviews(
        &self,
        provider_id: &UserId,
    ) -> Result<responses::ProviderReviews, ClientError> {
        let response = self
            .empty_get(&format!("reviews/provider/{provider_id}"))
            .await?;
        ok_body(response).await
    }

    pub async fn list_notifications(
        &self,
    ) -> Result<Vec<responses::Notification>, ClientError> {
        let response = self.empty_get("notifications").await?;
        ok_body(response).await
    }

    pub async fn mark_notification_read(
        &self,
        notification_id: &NotificationId,
    ) -> Result<(), ClientError> {
        let response =
            self.post("mark_notification_read", notification_id).await?;
        ok_empty(response).await
    }

    pub async fn send_message(
        &self,
        details: &requests::SendMessage,
    ) -> Result<responses::Message, ClientError> {
        let response = self.post("send_message", details).await?;
        ok_body(response).await
    }

    pub async fn list_messages(
        &self,
        booking_id: &BookingId,
    ) -> Result<Vec<responses::Message>, ClientError> {
        let response =
            self.empty_get(&format!("messages/{booking_id}")).await?;
        ok_body(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(response.json::<T>().await?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(())
}
