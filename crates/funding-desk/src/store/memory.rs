use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use super::{
    ApplicationDocumentRecord, ApplicationStatus, ApplicationStore, BookRecord, BookStore,
    FundingApplicationRecord, Notification, NotificationRecord, NotificationSink, NotifyError,
    StoreError,
};

/// In-memory backend used by tests and the demo runner. Wrap in an [`Arc`]
/// to share across handlers.
///
/// [`Arc`]: std::sync::Arc
#[derive(Debug, Default)]
pub struct MemoryStore {
    applications: Mutex<BTreeMap<String, FundingApplicationRecord>>,
    documents: Mutex<Vec<ApplicationDocumentRecord>>,
    books: Mutex<BTreeMap<String, BookRecord>>,
    notifications: Mutex<Vec<NotificationRecord>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn assign_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{n:06}")
    }

    /// Notifications delivered so far, oldest first.
    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn seed_books(&self, books: impl IntoIterator<Item = BookRecord>) {
        let mut guard = self
            .books
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for book in books {
            guard.insert(book.id.clone(), book);
        }
    }
}

impl ApplicationStore for MemoryStore {
    fn create(
        &self,
        mut record: FundingApplicationRecord,
    ) -> Result<FundingApplicationRecord, StoreError> {
        if record.id.is_empty() {
            record.id = self.assign_id("app");
        }
        let mut guard = self
            .applications
            .lock()
            .map_err(|_| StoreError::Unavailable("application table poisoned".to_string()))?;
        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn create_documents(
        &self,
        documents: Vec<ApplicationDocumentRecord>,
    ) -> Result<(), StoreError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|_| StoreError::Unavailable("document table poisoned".to_string()))?;
        guard.extend(documents);
        Ok(())
    }

    fn fetch(&self, id: &str) -> Result<Option<FundingApplicationRecord>, StoreError> {
        let guard = self
            .applications
            .lock()
            .map_err(|_| StoreError::Unavailable("application table poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn fetch_documents(
        &self,
        application_id: &str,
    ) -> Result<Vec<ApplicationDocumentRecord>, StoreError> {
        let guard = self
            .documents
            .lock()
            .map_err(|_| StoreError::Unavailable("document table poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|doc| doc.application_id == application_id)
            .cloned()
            .collect())
    }

    fn list(&self) -> Result<Vec<FundingApplicationRecord>, StoreError> {
        let guard = self
            .applications
            .lock()
            .map_err(|_| StoreError::Unavailable("application table poisoned".to_string()))?;
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records)
    }

    fn update_status(&self, id: &str, status: ApplicationStatus) -> Result<(), StoreError> {
        let mut guard = self
            .applications
            .lock()
            .map_err(|_| StoreError::Unavailable("application table poisoned".to_string()))?;
        match guard.get_mut(id) {
            Some(record) => {
                record.status = status;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut guard = self
            .applications
            .lock()
            .map_err(|_| StoreError::Unavailable("application table poisoned".to_string()))?;
        if guard.remove(id).is_none() {
            return Err(StoreError::NotFound);
        }
        drop(guard);
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| StoreError::Unavailable("document table poisoned".to_string()))?;
        documents.retain(|doc| doc.application_id != id);
        Ok(())
    }
}

impl BookStore for MemoryStore {
    fn list_books(&self) -> Result<Vec<BookRecord>, StoreError> {
        let guard = self
            .books
            .lock()
            .map_err(|_| StoreError::Unavailable("book table poisoned".to_string()))?;
        Ok(guard.values().cloned().collect())
    }

    fn create_book(&self, mut book: BookRecord) -> Result<BookRecord, StoreError> {
        if book.id.is_empty() {
            book.id = self.assign_id("book");
        }
        let mut guard = self
            .books
            .lock()
            .map_err(|_| StoreError::Unavailable("book table poisoned".to_string()))?;
        if guard.contains_key(&book.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(book.id.clone(), book.clone());
        Ok(book)
    }
}

impl NotificationSink for MemoryStore {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        let record = NotificationRecord {
            id: self.assign_id("ntf"),
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            priority: notification.priority,
            is_read: false,
            related_entity: notification.related_entity,
            related_entity_id: notification.related_entity_id,
            created_at: Utc::now(),
        };
        let mut guard = self
            .notifications
            .lock()
            .map_err(|_| NotifyError::Transport("notification table poisoned".to_string()))?;
        guard.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NotificationKind, NotificationPriority};
    use chrono::TimeZone;

    fn record(id: &str, day: u32) -> FundingApplicationRecord {
        FundingApplicationRecord {
            id: id.to_string(),
            program_id: "startup".to_string(),
            program_name: "Startup Boost".to_string(),
            payload: "{}".to_string(),
            status: ApplicationStatus::Submitted,
            applicant_email: "a@b.com".to_string(),
            submitted_at: Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn create_assigns_ids_and_rejects_duplicates() {
        let store = MemoryStore::new();
        let created = store
            .create(record("", 1))
            .expect("create with empty id");
        assert!(created.id.starts_with("app-"));

        let err = store.create(created.clone()).unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }

    #[test]
    fn list_orders_newest_first() {
        let store = MemoryStore::new();
        store.create(record("a", 3)).unwrap();
        store.create(record("b", 9)).unwrap();
        store.create(record("c", 6)).unwrap();

        let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn delete_removes_application_and_documents() {
        let store = MemoryStore::new();
        store.create(record("a", 1)).unwrap();
        store
            .create_documents(vec![ApplicationDocumentRecord {
                application_id: "a".to_string(),
                document_type: "businessPlan".to_string(),
                file_name: "plan.pdf".to_string(),
                uploaded_at: Utc::now(),
            }])
            .unwrap();

        store.delete("a").unwrap();
        assert!(store.fetch("a").unwrap().is_none());
        assert!(store.fetch_documents("a").unwrap().is_empty());
        assert!(matches!(store.delete("a").unwrap_err(), StoreError::NotFound));
    }

    #[test]
    fn update_status_on_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_status("ghost", ApplicationStatus::Approved)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn notifications_are_recorded_unread() {
        let store = MemoryStore::new();
        store
            .notify(Notification {
                kind: NotificationKind::Success,
                priority: NotificationPriority::Medium,
                title: "Application Submitted".to_string(),
                message: "FA-STARTUP-1".to_string(),
                related_entity: Some("FundingApplications".to_string()),
                related_entity_id: Some("app-000001".to_string()),
            })
            .unwrap();

        let delivered = store.notifications();
        assert_eq!(delivered.len(), 1);
        assert!(!delivered[0].is_read);
        assert_eq!(delivered[0].kind, NotificationKind::Success);
    }
}
