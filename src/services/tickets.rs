//! Ticket list, detail, status transitions and deletion.

use crate::domain::ticket::{Ticket, TicketStatus};
use crate::domain::types::TicketId;
use crate::dto::main::{IndexPageData, IndexQuery};
use crate::dto::tickets::TicketPageData;
use crate::filter::TicketListView;
use crate::repository::{TicketReader, TicketWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::session::AuthenticatedSession;

pub const ADMIN_DELETE_ONLY: &str = "Only admin users can delete tickets";
pub const ADMIN_STATUS_ONLY: &str = "Only admin users can change ticket status";

/// Parses a path id; non-positive ids cannot exist.
pub fn parse_ticket_id(id: i64) -> ServiceResult<TicketId> {
    TicketId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Fetches every ticket once and filters/pages it in memory.
///
/// A failed fetch renders an empty list; only an expired session is
/// reported to the caller.
pub async fn load_index_page<R>(
    repo: &R,
    auth: &AuthenticatedSession,
    query: &IndexQuery,
    per_page: usize,
) -> ServiceResult<IndexPageData>
where
    R: TicketReader + ?Sized,
{
    let tickets = match repo.list_tickets(&auth.token).await {
        Ok(tickets) => tickets,
        Err(err) => match ServiceError::from(err) {
            ServiceError::SessionExpired => return Err(ServiceError::SessionExpired),
            err => {
                log::error!("Failed to list tickets: {err}");
                Vec::new()
            }
        },
    };
    let total_unfiltered = tickets.len();

    let mut view = TicketListView::new(query.to_filter());
    let requested_page = view.filter().current_page();
    view.replace_tickets(tickets);
    view.filter_mut().go_to_page(requested_page);

    let filter = view.filter().clone();
    let tickets = view.into_page(per_page);

    Ok(IndexPageData {
        tickets,
        filter,
        total_unfiltered,
    })
}

/// Loads a single ticket with its display history.
pub async fn load_ticket<R>(
    repo: &R,
    auth: &AuthenticatedSession,
    id: i64,
) -> ServiceResult<TicketPageData>
where
    R: TicketReader + ?Sized,
{
    let ticket = fetch_ticket(repo, auth, parse_ticket_id(id)?).await?;
    Ok(TicketPageData::from(ticket))
}

pub(crate) async fn fetch_ticket<R>(
    repo: &R,
    auth: &AuthenticatedSession,
    id: TicketId,
) -> ServiceResult<Ticket>
where
    R: TicketReader + ?Sized,
{
    repo.get_ticket(&auth.token, id)
        .await
        .map_err(|err| {
            log::error!("Failed to get ticket {id}: {err}");
            ServiceError::from(err)
        })?
        .ok_or(ServiceError::NotFound)
}

/// Moves a ticket to `status` and returns the server's copy.
///
/// Admin-only. Selecting the current status is refused without sending the
/// update.
pub async fn change_status<R>(
    repo: &R,
    auth: &AuthenticatedSession,
    id: i64,
    status: &str,
) -> ServiceResult<Ticket>
where
    R: TicketReader + TicketWriter + ?Sized,
{
    if !auth.is_admin() {
        return Err(ServiceError::Forbidden(ADMIN_STATUS_ONLY.to_string()));
    }

    let id = parse_ticket_id(id)?;
    let target: TicketStatus = status
        .trim()
        .parse()
        .map_err(|_| ServiceError::Form("Unknown status".to_string()))?;

    let current = fetch_ticket(repo, auth, id).await?;
    if !current.status.can_transition_to(target) {
        return Err(ServiceError::Form(format!("Ticket is already {target}")));
    }

    let updated = repo
        .update_ticket_status(&auth.token, id, target)
        .await
        .map_err(|err| {
            log::error!("Failed to update status of ticket {id}: {err}");
            ServiceError::from(err)
        })?;

    if !updated.history_is_consistent() {
        log::warn!("Ticket {id} history does not end with its status {}", updated.status);
    }

    Ok(updated)
}

/// Deletes a ticket. Admin-only; non-admins never reach the API.
pub async fn delete_ticket<R>(repo: &R, auth: &AuthenticatedSession, id: i64) -> ServiceResult<()>
where
    R: TicketWriter + ?Sized,
{
    if !auth.is_admin() {
        return Err(ServiceError::Forbidden(ADMIN_DELETE_ONLY.to_string()));
    }

    let id = parse_ticket_id(id)?;

    repo.delete_ticket(&auth.token, id).await.map_err(|err| {
        log::error!("Failed to delete ticket {id}: {err}");
        ServiceError::from(err)
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::{auth, ticket};
    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn seven_tickets() -> Vec<Ticket> {
        (1..=7)
            .map(|id| ticket(id, &format!("Ticket {id}"), TicketStatus::New))
            .collect()
    }

    #[actix_web::test]
    async fn index_pages_fetched_tickets() {
        let mut repo = MockRepository::new();
        repo.expect_list_tickets()
            .withf(|token| token.as_str() == "token-1")
            .times(1)
            .returning(|_| Ok(seven_tickets()));

        let query = IndexQuery {
            page: Some("2".into()),
            ..IndexQuery::default()
        };
        let data = load_index_page(&repo, &auth(false), &query, 6).await.unwrap();

        assert_eq!(data.total_unfiltered, 7);
        assert_eq!(data.tickets.total_pages, 2);
        assert_eq!(data.tickets.page, 2);
        assert_eq!(data.tickets.items.len(), 1);
        assert_eq!(data.tickets.items[0].id.get(), 7);
        assert_eq!(
            (data.tickets.first_index, data.tickets.last_index),
            (7, 7)
        );
    }

    #[actix_web::test]
    async fn index_applies_filters_from_query() {
        let mut repo = MockRepository::new();
        repo.expect_list_tickets().returning(|_| {
            Ok(vec![
                ticket(1, "Login bug", TicketStatus::New),
                ticket(2, "Invoice", TicketStatus::Resolved),
                ticket(3, "Another BUG", TicketStatus::Resolved),
            ])
        });

        let query = IndexQuery {
            search: Some("bug".into()),
            status: Some("Resolved".into()),
            ..IndexQuery::default()
        };
        let data = load_index_page(&repo, &auth(false), &query, 6).await.unwrap();

        let ids: Vec<i64> = data.tickets.items.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(data.total_unfiltered, 3);
    }

    #[actix_web::test]
    async fn failed_fetch_shows_empty_list() {
        let mut repo = MockRepository::new();
        repo.expect_list_tickets()
            .returning(|_| Err(RepositoryError::ConnectionError("refused".into())));

        let data = load_index_page(&repo, &auth(false), &IndexQuery::default(), 6)
            .await
            .unwrap();

        assert!(data.tickets.items.is_empty());
        assert_eq!(data.tickets.page, 1);
    }

    #[actix_web::test]
    async fn rejected_token_expires_session() {
        let mut repo = MockRepository::new();
        repo.expect_list_tickets()
            .returning(|_| Err(RepositoryError::Unauthorized("expired".into())));

        let result = load_index_page(&repo, &auth(false), &IndexQuery::default(), 6).await;

        assert!(matches!(result, Err(ServiceError::SessionExpired)));
    }

    #[actix_web::test]
    async fn missing_ticket_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket().returning(|_, _| Ok(None));

        let result = load_ticket(&repo, &auth(false), 99).await;
        assert!(matches!(result, Err(ServiceError::NotFound)));

        let result = load_ticket(&repo, &auth(false), 0).await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[actix_web::test]
    async fn detail_synthesizes_history_for_legacy_tickets() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket().returning(|_, _| {
            let mut legacy = ticket(4, "Old", TicketStatus::UnderReview);
            legacy.status_history.clear();
            Ok(Some(legacy))
        });

        let data = load_ticket(&repo, &auth(false), 4).await.unwrap();

        assert_eq!(data.history.len(), 1);
        assert_eq!(data.history[0].status, TicketStatus::UnderReview);
        assert_eq!(
            data.transitions,
            vec![TicketStatus::New, TicketStatus::Resolved]
        );
    }

    #[actix_web::test]
    async fn non_admin_cannot_change_status() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket().times(0);
        repo.expect_update_ticket_status().times(0);

        let result = change_status(&repo, &auth(false), 1, "Resolved").await;

        assert!(
            matches!(result, Err(ServiceError::Forbidden(ref m)) if m == ADMIN_STATUS_ONLY)
        );
    }

    #[actix_web::test]
    async fn same_status_is_refused_without_update() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket()
            .returning(|_, _| Ok(Some(ticket(1, "VPN", TicketStatus::Resolved))));
        repo.expect_update_ticket_status().times(0);

        let result = change_status(&repo, &auth(true), 1, "Resolved").await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn admin_can_reopen_resolved_ticket() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket()
            .returning(|_, _| Ok(Some(ticket(1, "VPN", TicketStatus::Resolved))));
        repo.expect_update_ticket_status()
            .withf(|token, id, status| {
                token.as_str() == "token-1" && id.get() == 1 && *status == TicketStatus::New
            })
            .times(1)
            .returning(|_, _, status| {
                let mut updated = ticket(1, "VPN", TicketStatus::Resolved);
                updated.status = status;
                updated.status_history.push(crate::domain::ticket::StatusChange {
                    status,
                    changed_at: updated.created_at,
                    changed_by: None,
                });
                Ok(updated)
            });

        let updated = change_status(&repo, &auth(true), 1, "New").await.unwrap();

        assert_eq!(updated.status, TicketStatus::New);
        assert_eq!(
            updated.status_history.last().map(|entry| entry.status),
            Some(TicketStatus::New)
        );
    }

    #[actix_web::test]
    async fn unknown_status_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_update_ticket_status().times(0);

        let result = change_status(&repo, &auth(true), 1, "Closed").await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn non_admin_delete_sends_no_request() {
        let mut repo = MockRepository::new();
        repo.expect_delete_ticket().times(0);

        let result = delete_ticket(&repo, &auth(false), 3).await;

        assert!(
            matches!(result, Err(ServiceError::Forbidden(ref m)) if m == ADMIN_DELETE_ONLY)
        );
    }

    #[actix_web::test]
    async fn admin_delete_reports_server_detail() {
        let mut repo = MockRepository::new();
        repo.expect_delete_ticket()
            .withf(|_, id| id.get() == 3)
            .times(1)
            .returning(|_, _| Err(RepositoryError::Forbidden("Not allowed.".into())));

        let err = delete_ticket(&repo, &auth(true), 3).await.unwrap_err();

        assert_eq!(err.message_or("Failed to delete ticket"), "Not allowed.");
    }
}
