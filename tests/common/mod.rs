#![allow(dead_code)]

use cohortdesk::backend::{Group, InMemoryBackend, Student};

pub fn student(sid: &str) -> Student {
    Student {
        sid: sid.to_string(),
        uid: format!("uid-{}", sid),
        first_name: "Test".to_string(),
        last_name: format!("Student {}", sid),
    }
}

/// `n` students with sids "1000", "1001", ...
pub fn roster(n: usize) -> Vec<Student> {
    (0..n).map(|i| student(&(1000 + i).to_string())).collect()
}

/// A logged-in advisor owning one empty group named "Cool Kids"
pub fn backend_with_group() -> (InMemoryBackend, Group) {
    let backend = InMemoryBackend::logged_in("6446", "Test Advisor");
    let group = backend.insert_group("Cool Kids", &[]);
    (backend, group)
}
