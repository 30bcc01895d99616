use crate::io::remote::RemoteError;
use crate::model::Section;
use crate::ops::cache::EntityCache;
use crate::ops::outcome::{EntityKind, Halt, Outcome, Soft, finish};
use crate::ops::resolve::{find_exact, find_exact_or_partial, require_project};

fn project_scope(
    cache: &mut EntityCache<'_>,
    project: Option<&str>,
    context: &'static str,
) -> Result<String, Halt> {
    let partial = project.ok_or(Soft::ProjectRequired { context })?;
    require_project(cache, partial)
}

/// Sections of a project, sorted by name ignoring case.
pub fn list_sections(
    cache: &mut EntityCache<'_>,
    project: Option<&str>,
) -> Result<Outcome<Vec<Section>>, RemoteError> {
    finish(list_inner(cache, project))
}

fn list_inner(cache: &mut EntityCache<'_>, project: Option<&str>) -> Result<Vec<Section>, Halt> {
    let pid = project_scope(cache, project, "listing sections")?;
    let mut sections = cache.sections(&pid)?.to_vec();
    sections.sort_by_cached_key(|s| s.name.to_lowercase());
    Ok(sections)
}

pub fn create_section(
    cache: &mut EntityCache<'_>,
    project: Option<&str>,
    name: &str,
) -> Result<Outcome<Section>, RemoteError> {
    finish(create_inner(cache, project, name))
}

fn create_inner(
    cache: &mut EntityCache<'_>,
    project: Option<&str>,
    name: &str,
) -> Result<Section, Halt> {
    let pid = project_scope(cache, project, "creating a section")?;
    let sections = cache.sections(&pid)?;
    if let Some(existing) = find_exact(&sections[..], name) {
        return Err(Soft::Duplicate {
            kind: EntityKind::Section,
            name: existing.name.clone(),
            id: existing.id.clone(),
        }
        .into());
    }
    let section = cache.remote().add_section(name, &pid)?;
    log::info!("created section {} in project {}", section.id, pid);
    cache.invalidate_sections(&pid);
    Ok(section)
}

/// Rename the section whose name equals `name` (ignoring case).
pub fn update_section(
    cache: &mut EntityCache<'_>,
    project: Option<&str>,
    name: &str,
    new_name: &str,
) -> Result<Outcome<Section>, RemoteError> {
    finish(update_inner(cache, project, name, new_name))
}

fn update_inner(
    cache: &mut EntityCache<'_>,
    project: Option<&str>,
    name: &str,
    new_name: &str,
) -> Result<Section, Halt> {
    let pid = project_scope(cache, project, "updating a section")?;
    let sections = cache.sections(&pid)?;
    let target = find_exact(&sections[..], name).ok_or_else(|| Soft::NotFound {
        kind: EntityKind::Section,
        query: name.to_string(),
    })?;
    let updated = cache.remote().update_section(&target.id, new_name)?;
    log::info!("renamed section {}", updated.id);
    cache.invalidate_sections(&pid);
    Ok(updated)
}

/// Delete a section by exact name, falling back to the first partial match.
///
/// Tasks in the section go with it, so the project's task slots are dropped.
pub fn delete_section(
    cache: &mut EntityCache<'_>,
    project: Option<&str>,
    name: &str,
) -> Result<Outcome<Section>, RemoteError> {
    finish(delete_inner(cache, project, name))
}

fn delete_inner(
    cache: &mut EntityCache<'_>,
    project: Option<&str>,
    name: &str,
) -> Result<Section, Halt> {
    let pid = project_scope(cache, project, "deleting a section")?;
    let sections = cache.sections(&pid)?;
    let target = find_exact_or_partial(&sections[..], name)
        .cloned()
        .ok_or_else(|| Soft::NotFound {
            kind: EntityKind::Section,
            query: name.to_string(),
        })?;
    cache.remote().delete_section(&target.id)?;
    log::info!("deleted section {}", target.id);
    cache.invalidate_sections(&pid);
    cache.invalidate_tasks(Some(&pid));
    Ok(target)
}
