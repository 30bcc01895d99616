//! Turning what the user typed into entity identifiers.
//!
//! Partial matching is a case-insensitive substring test over the listing in
//! service order; the first hit wins, not the closest one.

use crate::io::remote::RemoteError;
use crate::model::{Label, Project, Section, Task};
use crate::ops::cache::EntityCache;
use crate::ops::outcome::{Halt, Soft};
use crate::util::unicode::fold_name;

/// Anything with a user-visible name that can be matched against input
pub trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl Named for Project {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Section {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Label {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Task {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.content
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// First item whose name contains `partial`, ignoring case.
pub fn find_partial<'a, T: Named>(items: &'a [T], partial: &str) -> Option<&'a T> {
    let needle = partial.to_lowercase();
    items
        .iter()
        .find(|item| item.name().to_lowercase().contains(&needle))
}

/// First item whose trimmed name equals trimmed `name`, ignoring case.
pub fn find_exact<'a, T: Named>(items: &'a [T], name: &str) -> Option<&'a T> {
    let needle = fold_name(name);
    items.iter().find(|item| fold_name(item.name()) == needle)
}

/// Exact match first, then first partial match.
pub fn find_exact_or_partial<'a, T: Named>(items: &'a [T], name: &str) -> Option<&'a T> {
    find_exact(items, name).or_else(|| find_partial(items, name))
}

/// Project lookup: an all-digit input is first tried as an id.
pub fn find_project<'a>(projects: &'a [Project], partial: &str) -> Option<&'a Project> {
    if is_numeric(partial)
        && let Some(p) = projects.iter().find(|p| p.id == partial)
    {
        return Some(p);
    }
    find_partial(projects, partial)
}

/// Resolve a project partial name (or numeric id) to its id.
pub fn resolve_project_id(
    cache: &mut EntityCache<'_>,
    partial: &str,
) -> Result<Option<String>, RemoteError> {
    let projects = cache.projects()?;
    let found = find_project(&projects[..], partial).map(|p| p.id.clone());
    log::debug!("resolve project '{}' -> {:?}", partial, found);
    Ok(found)
}

/// Resolve a section partial name within one project to its id.
pub fn resolve_section_id(
    cache: &mut EntityCache<'_>,
    project_id: &str,
    partial: &str,
) -> Result<Option<String>, RemoteError> {
    let sections = cache.sections(project_id)?;
    let found = find_partial(&sections[..], partial).map(|s| s.id.clone());
    log::debug!(
        "resolve section '{}' in project {} -> {:?}",
        partial,
        project_id,
        found
    );
    Ok(found)
}

/// Like [`resolve_project_id`], but a miss becomes a soft halt.
pub(crate) fn require_project(cache: &mut EntityCache<'_>, partial: &str) -> Result<String, Halt> {
    resolve_project_id(cache, partial)?.ok_or_else(|| {
        Halt::Soft(Soft::ProjectNotFound {
            query: partial.to_string(),
        })
    })
}

/// Like [`resolve_section_id`], but a miss becomes a soft halt.
pub(crate) fn require_section(
    cache: &mut EntityCache<'_>,
    project_id: &str,
    project_query: &str,
    partial: &str,
) -> Result<String, Halt> {
    resolve_section_id(cache, project_id, partial)?.ok_or_else(|| {
        Halt::Soft(Soft::SectionNotFound {
            query: partial.to_string(),
            project: project_query.to_string(),
        })
    })
}

/// Resolve an optional project scope. `None` in means `None` out.
pub(crate) fn optional_project(
    cache: &mut EntityCache<'_>,
    partial: Option<&str>,
) -> Result<Option<String>, Halt> {
    partial.map(|p| require_project(cache, p)).transpose()
}
