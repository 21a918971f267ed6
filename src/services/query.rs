//! Query Engine
//!
//! Conjunctive filtering and offset/limit pagination over in-memory lists.
//! Both operations are total and never mutate their input.

use crate::models::{
    BuildFilters, ChangeDocument, ChangeDocumentFilters, Job, JobFilters, Page, Pagination,
    Project, ProjectFilters,
};

/// A set of filter predicates applicable to items of type `T`
pub trait Predicate<T> {
    /// Whether `item` satisfies every present predicate
    fn matches(&self, item: &T) -> bool;
}

/// Keep the items matching `predicate`, preserving order
pub fn filter<T, P>(items: &[T], predicate: &P) -> Vec<T>
where
    T: Clone,
    P: Predicate<T> + ?Sized,
{
    items
        .iter()
        .filter(|item| predicate.matches(item))
        .cloned()
        .collect()
}

/// Slice out page `page` (1-indexed) of size `limit`
///
/// Pages past the end yield an empty slice rather than an error. A `limit`
/// of 0 yields an empty page with `total_pages == 0`; a `page` of 0 yields
/// an empty page.
pub fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> Page<T> {
    let total = items.len();
    let per_page = limit as usize;

    let total_pages = if per_page == 0 {
        0
    } else {
        total.div_ceil(per_page)
    };

    let data = if page == 0 || per_page == 0 {
        Vec::new()
    } else {
        let start = (page as usize - 1).saturating_mul(per_page);
        if start >= total {
            Vec::new()
        } else {
            let end = start.saturating_add(per_page).min(total);
            items[start..end].to_vec()
        }
    };

    Page {
        data,
        pagination: Pagination {
            total,
            page,
            limit,
            total_pages,
            has_next_page: (page as usize) < total_pages,
            has_prev_page: page > 1,
        },
    }
}

/// A predicate value, treating empty strings as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Exact-match check that passes when the predicate is absent
fn equals(predicate: &Option<String>, actual: &str) -> bool {
    present(predicate).map_or(true, |expected| expected == actual)
}

/// Case-insensitive substring search over `fields`
fn search_any(predicate: &Option<String>, fields: &[&str]) -> bool {
    match present(predicate) {
        None => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            fields
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        }
    }
}

impl Predicate<ChangeDocument> for ChangeDocumentFilters {
    fn matches(&self, doc: &ChangeDocument) -> bool {
        equals(&self.status, doc.status.as_str())
            && equals(&self.ci_type, doc.ci_type.as_str())
            && equals(&self.repository, &doc.repository)
            && search_any(
                &self.search,
                &[&doc.id, &doc.change_number, &doc.rdc.title, &doc.owner.name],
            )
            && equals(&self.ci_status, doc.current_state.ci_status.as_str())
    }
}

impl Predicate<Job> for JobFilters {
    fn matches(&self, job: &Job) -> bool {
        equals(&self.status, job.status.as_str())
            && equals(&self.project_id, &job.project_id)
            && equals(&self.job_type, &job.job_type)
            && equals(&self.build_type, &job.build_type)
            && equals(&self.change_number, &job.change_number)
            && search_any(
                &self.search,
                &[&job.job_id, &job.job_name, &job.project_name, &job.commit_id],
            )
    }
}

impl Predicate<Job> for BuildFilters {
    fn matches(&self, job: &Job) -> bool {
        equals(&self.status, job.status.as_str())
    }
}

impl Predicate<Project> for ProjectFilters {
    fn matches(&self, project: &Project) -> bool {
        equals(&self.status, project.status.as_str())
            && equals(&self.repository, &project.repository)
            && search_any(
                &self.search,
                &[&project.id, &project.name, &project.description],
            )
    }
}
