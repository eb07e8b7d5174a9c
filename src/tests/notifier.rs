#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::{
        models::{event::ChangeEvent, session::SessionStatus},
        service::notifier::ChangeNotifier,
    };

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let notifier = ChangeNotifier::new();
        let session_id = Uuid::new_v4();

        let mut receiver = notifier.subscribe(session_id);

        let event = ChangeEvent::AnswerSubmitted {
            session_id,
            question_index: 2,
        };
        notifier.publish(event.clone());

        assert_eq!(receiver.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn events_only_reach_their_own_topic() {
        let notifier = ChangeNotifier::new();
        let session_a = Uuid::new_v4();
        let session_b = Uuid::new_v4();

        let mut receiver_a = notifier.subscribe(session_a);
        let mut receiver_b = notifier.subscribe(session_b);

        notifier.publish(ChangeEvent::SessionUpdated {
            session_id: session_a,
            status: SessionStatus::Active,
            current_index: 1,
        });

        assert!(receiver_a.recv().await.is_ok());
        assert!(receiver_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_topic_is_a_noop() {
        let notifier = ChangeNotifier::new();

        // No subscriber ever registered for this session.
        notifier.publish(ChangeEvent::AnswerSubmitted {
            session_id: Uuid::new_v4(),
            question_index: 0,
        });
    }

    #[tokio::test]
    async fn subscriber_count_tracks_topic() {
        let notifier = ChangeNotifier::new();
        let session_id = Uuid::new_v4();

        assert_eq!(notifier.subscriber_count(session_id), 0);

        let receiver_one = notifier.subscribe(session_id);
        let receiver_two = notifier.subscribe(session_id);
        assert_eq!(notifier.subscriber_count(session_id), 2);

        drop(receiver_one);
        drop(receiver_two);
        assert_eq!(notifier.subscriber_count(session_id), 0);
    }

    #[tokio::test]
    async fn dropped_topic_closes_its_subscribers() {
        let notifier = ChangeNotifier::new();
        let session_id = Uuid::new_v4();

        let mut receiver = notifier.subscribe(session_id);
        notifier.drop_topic(session_id);

        assert!(receiver.recv().await.is_err());
    }
}
