use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::{Form, Part};

use crate::api_client::{decode_json_response, decode_optional_json_response, expect_success};
use crate::domain::ticket::{
    NewTicket, Ticket, TicketAttachment, TicketStatus, UpdateTicket,
};
use crate::domain::types::{AccessToken, TicketId};
use crate::models::ticket::{StatusPatch, Ticket as ApiTicket, TicketPayload};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ApiRepository, TicketReader, TicketWriter};

fn ticket_path(id: TicketId) -> String {
    format!("/tickets/{id}/")
}

/// Multipart body carrying the ticket fields plus the uploaded file.
fn multipart_form(
    payload: &TicketPayload<'_>,
    attachment: &TicketAttachment,
) -> RepositoryResult<Form> {
    let part = Part::bytes(attachment.bytes.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.content_type)
        .map_err(|e| RepositoryError::ValidationError(format!("Invalid content type: {e}")))?;

    Ok(Form::new()
        .text("title", payload.title.to_string())
        .text("description", payload.description.to_string())
        .text("category", payload.category.to_string())
        .text("status", payload.status.to_string())
        .part("attachment", part))
}

impl ApiRepository {
    async fn send_ticket(
        &self,
        method: Method,
        path: &str,
        token: &AccessToken,
        payload: TicketPayload<'_>,
        attachment: Option<&TicketAttachment>,
    ) -> RepositoryResult<Ticket> {
        let request = self.client().request(method, path, Some(token));
        let request = match attachment {
            Some(attachment) => request.multipart(multipart_form(&payload, attachment)?),
            None => request.json(&payload),
        };

        let ticket: ApiTicket = decode_json_response(request.send().await?).await?;
        Ok(Ticket::try_from(ticket)?)
    }
}

#[async_trait]
impl TicketReader for ApiRepository {
    async fn list_tickets(&self, token: &AccessToken) -> RepositoryResult<Vec<Ticket>> {
        let response = self
            .client()
            .request(Method::GET, "/tickets/", Some(token))
            .send()
            .await?;

        let tickets: Vec<ApiTicket> = decode_json_response(response).await?;
        tickets
            .into_iter()
            .map(|ticket| Ticket::try_from(ticket).map_err(RepositoryError::from))
            .collect()
    }

    async fn get_ticket(
        &self,
        token: &AccessToken,
        id: TicketId,
    ) -> RepositoryResult<Option<Ticket>> {
        let response = self
            .client()
            .request(Method::GET, &ticket_path(id), Some(token))
            .send()
            .await?;

        let ticket: Option<ApiTicket> = decode_optional_json_response(response).await?;
        Ok(ticket.map(Ticket::try_from).transpose()?)
    }
}

#[async_trait]
impl TicketWriter for ApiRepository {
    async fn create_ticket(
        &self,
        token: &AccessToken,
        ticket: &NewTicket,
    ) -> RepositoryResult<Ticket> {
        self.send_ticket(
            Method::POST,
            "/tickets/",
            token,
            TicketPayload::from(ticket),
            ticket.attachment.as_ref(),
        )
        .await
    }

    async fn update_ticket(
        &self,
        token: &AccessToken,
        id: TicketId,
        ticket: &UpdateTicket,
    ) -> RepositoryResult<Ticket> {
        self.send_ticket(
            Method::PUT,
            &ticket_path(id),
            token,
            TicketPayload::from(ticket),
            ticket.attachment.as_ref(),
        )
        .await
    }

    async fn update_ticket_status(
        &self,
        token: &AccessToken,
        id: TicketId,
        status: TicketStatus,
    ) -> RepositoryResult<Ticket> {
        let response = self
            .client()
            .request(
                Method::PATCH,
                &format!("/tickets/{id}/status/"),
                Some(token),
            )
            .json(&StatusPatch::from(status))
            .send()
            .await?;

        let ticket: ApiTicket = decode_json_response(response).await?;
        Ok(Ticket::try_from(ticket)?)
    }

    async fn delete_ticket(&self, token: &AccessToken, id: TicketId) -> RepositoryResult<()> {
        let response = self
            .client()
            .request(Method::DELETE, &ticket_path(id), Some(token))
            .send()
            .await?;

        expect_success(response).await
    }
}
