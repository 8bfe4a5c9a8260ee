//! Gateway Tests
//!
//! Exercises MemoryGateway pagination, stamping, filtering and fan-out.

#[cfg(test)]
mod tests {
    use crate::domain::{Owner, Todo, TodoId};
    use crate::gateway::{
        CreateTodoInput, Cursor, Filter, GatewayError, MemoryGateway, PageRequest, TodoGateway,
        UpdateTodoInput,
    };
    use chrono::{TimeZone, Utc};

    fn input(name: &str, owner: Option<&str>) -> CreateTodoInput {
        CreateTodoInput {
            name: name.to_string(),
            description: None,
            complete: false,
            owner: owner.map(Owner::new),
        }
    }

    fn request(cursor: Option<Cursor>, limit: u32) -> PageRequest {
        PageRequest {
            cursor,
            limit,
            filter: Filter::all(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_increasing_stamps() {
        let gateway = MemoryGateway::new();

        let first = gateway.create_todo(input("one", None)).await.unwrap();
        let second = gateway.create_todo(input("two", None)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.updated_at > first.updated_at);
        assert!(!first.complete);
        assert_eq!(gateway.len().await, 2);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let gateway = MemoryGateway::new();
        let err = gateway.create_todo(input("  ", None)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_stamps_stay_ahead_of_seeded_future_items() {
        let gateway = MemoryGateway::new();
        let future = Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap();
        gateway.seed([Todo::new("seeded", "from the future", future)]).await;

        let created = gateway.create_todo(input("now", None)).await.unwrap();
        assert!(created.updated_at > future);
    }

    #[tokio::test]
    async fn test_pagination_walks_every_item_once() {
        let gateway = MemoryGateway::new();
        for i in 0..5 {
            gateway.create_todo(input(&format!("todo {i}"), None)).await.unwrap();
        }

        let p1 = gateway.fetch_page(request(None, 2)).await.unwrap();
        assert_eq!(p1.items.len(), 2);
        let p2 = gateway.fetch_page(request(p1.next_cursor.clone(), 2)).await.unwrap();
        assert_eq!(p2.items.len(), 2);
        let p3 = gateway.fetch_page(request(p2.next_cursor.clone(), 2)).await.unwrap();
        assert_eq!(p3.items.len(), 1);
        assert!(p3.next_cursor.is_none());

        let names: Vec<String> = p1
            .items
            .iter()
            .chain(&p2.items)
            .chain(&p3.items)
            .map(|t| t.name.clone())
            .collect();
        assert_eq!(names, vec!["todo 0", "todo 1", "todo 2", "todo 3", "todo 4"]);
    }

    #[tokio::test]
    async fn test_empty_backend_returns_single_empty_page() {
        let gateway = MemoryGateway::new();
        let page = gateway.fetch_page(request(None, 10)).await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_garbage_cursor_rejected() {
        let gateway = MemoryGateway::new();
        let err = gateway
            .fetch_page(request(Some(Cursor::new("not-a-number")), 10))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_cursor_past_end_rejected() {
        let gateway = MemoryGateway::new();
        gateway.create_todo(input("only", None)).await.unwrap();

        let err = gateway
            .fetch_page(request(Some(Cursor::new(usize::MAX.to_string())), 10))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_large_limit_does_not_overflow() {
        let gateway = MemoryGateway::new();
        for i in 0..3 {
            gateway.create_todo(input(&format!("todo {i}"), None)).await.unwrap();
        }

        let first = gateway.fetch_page(request(None, 1)).await.unwrap();
        let rest = gateway
            .fetch_page(request(first.next_cursor.clone(), u32::MAX))
            .await
            .unwrap();
        assert_eq!(rest.items.len(), 2);
        assert!(rest.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_fetch_filters_by_owner() {
        let gateway = MemoryGateway::new();
        gateway.create_todo(input("mine", Some("alice"))).await.unwrap();
        gateway.create_todo(input("theirs", Some("bob"))).await.unwrap();

        let page = gateway
            .fetch_page(PageRequest {
                cursor: None,
                limit: 10,
                filter: Filter::owned_by(Owner::new("alice")),
            })
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "mine");
    }

    #[tokio::test]
    async fn test_update_unknown_id_rejected() {
        let gateway = MemoryGateway::new();
        let err = gateway
            .update_todo(UpdateTodoInput::set_complete(TodoId::new("nope"), true))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_subscribers_receive_matching_events() {
        let gateway = MemoryGateway::new();
        let mut alice_created = gateway
            .subscribe_created(&Filter::owned_by(Owner::new("alice")))
            .await
            .unwrap();
        let mut all_updated = gateway.subscribe_updated(&Filter::all()).await.unwrap();

        gateway.create_todo(input("bob's", Some("bob"))).await.unwrap();
        let mine = gateway.create_todo(input("alice's", Some("alice"))).await.unwrap();
        let toggled = gateway
            .update_todo(UpdateTodoInput::set_complete(mine.id.clone(), true))
            .await
            .unwrap();

        assert_eq!(alice_created.next().await, Some(mine));
        let update = all_updated.next().await.unwrap();
        assert_eq!(update, toggled);
        assert!(update.complete);
    }

    #[tokio::test]
    async fn test_unsubscribed_listeners_are_dropped() {
        let gateway = MemoryGateway::new();
        let mut sub = gateway.subscribe_created(&Filter::all()).await.unwrap();
        let _other = gateway.subscribe_updated(&Filter::all()).await.unwrap();
        assert_eq!(gateway.subscriber_count().await, 2);

        sub.unsubscribe();
        assert!(sub.is_cancelled());
        gateway.create_todo(input("after", None)).await.unwrap();

        assert_eq!(gateway.subscriber_count().await, 1);
        assert_eq!(sub.next().await, None);
    }

    #[tokio::test]
    async fn test_injected_failure_applies_once() {
        let gateway = MemoryGateway::new();
        gateway
            .fail_next(GatewayError::Transport("connection reset".to_string()))
            .await;

        let err = gateway.fetch_page(request(None, 10)).await.unwrap_err();
        assert_eq!(err, GatewayError::Transport("connection reset".to_string()));
        assert!(gateway.fetch_page(request(None, 10)).await.is_ok());
    }
}
