use crate::io::remote::RemoteError;
use crate::model::Project;
use crate::ops::cache::EntityCache;
use crate::ops::outcome::{EntityKind, Halt, Outcome, Soft, finish};
use crate::ops::resolve::{find_exact, find_project};

/// All projects, sorted by name ignoring case.
pub fn list_projects(cache: &mut EntityCache<'_>) -> Result<Vec<Project>, RemoteError> {
    let mut projects = cache.projects()?.to_vec();
    projects.sort_by_cached_key(|p| p.name.to_lowercase());
    Ok(projects)
}

pub fn create_project(
    cache: &mut EntityCache<'_>,
    name: &str,
) -> Result<Outcome<Project>, RemoteError> {
    finish(create_inner(cache, name))
}

fn create_inner(cache: &mut EntityCache<'_>, name: &str) -> Result<Project, Halt> {
    let projects = cache.projects()?;
    if let Some(existing) = find_exact(&projects[..], name) {
        return Err(Soft::Duplicate {
            kind: EntityKind::Project,
            name: existing.name.clone(),
            id: existing.id.clone(),
        }
        .into());
    }
    let project = cache.remote().add_project(name)?;
    log::info!("created project {}", project.id);
    cache.invalidate_projects();
    Ok(project)
}

/// Rename the project whose name equals `name` (ignoring case).
pub fn update_project(
    cache: &mut EntityCache<'_>,
    name: &str,
    new_name: &str,
) -> Result<Outcome<Project>, RemoteError> {
    finish(update_inner(cache, name, new_name))
}

fn update_inner(cache: &mut EntityCache<'_>, name: &str, new_name: &str) -> Result<Project, Halt> {
    let projects = cache.projects()?;
    let target = find_exact(&projects[..], name).ok_or_else(|| Soft::NotFound {
        kind: EntityKind::Project,
        query: name.to_string(),
    })?;
    let updated = cache.remote().update_project(&target.id, new_name)?;
    log::info!("renamed project {}", updated.id);
    cache.invalidate_projects();
    Ok(updated)
}

/// Delete a project by exact name, falling back to id / partial name.
///
/// The service deletes the project's sections and tasks with it, so those
/// slots are dropped too.
pub fn delete_project(
    cache: &mut EntityCache<'_>,
    name: &str,
) -> Result<Outcome<Project>, RemoteError> {
    finish(delete_inner(cache, name))
}

fn delete_inner(cache: &mut EntityCache<'_>, name: &str) -> Result<Project, Halt> {
    let projects = cache.projects()?;
    let target = find_exact(&projects[..], name)
        .or_else(|| find_project(&projects[..], name))
        .cloned()
        .ok_or_else(|| Soft::NotFound {
            kind: EntityKind::Project,
            query: name.to_string(),
        })?;
    cache.remote().delete_project(&target.id)?;
    log::info!("deleted project {}", target.id);
    cache.invalidate_projects();
    cache.invalidate_sections(&target.id);
    cache.invalidate_tasks(Some(&target.id));
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::cache::TaskScope;
    use crate::ops::test_helpers::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_sorted_case_insensitive() {
        let remote = FakeRemote::new();
        remote.add_project_row("1", "beta");
        remote.add_project_row("2", "Alpha");
        remote.add_project_row("3", "gamma");
        let mut cache = EntityCache::new(&remote);
        let names: Vec<String> = list_projects(&mut cache)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_create_and_duplicate() {
        let remote = sample_remote();
        let mut cache = EntityCache::new(&remote);
        let out = create_project(&mut cache, " WORK ").unwrap();
        assert_eq!(
            out.soft(),
            Some(&Soft::Duplicate {
                kind: EntityKind::Project,
                name: "Work".into(),
                id: "1".into()
            })
        );

        let created = create_project(&mut cache, "Garage").unwrap().done().unwrap();
        assert_eq!(created.name, "Garage");
        assert!(!cache.has_projects());
        assert_eq!(remote.projects().len(), 3);
    }

    #[test]
    fn test_update_requires_exact_name() {
        let remote = sample_remote();
        let mut cache = EntityCache::new(&remote);
        let out = update_project(&mut cache, "wor", "Job").unwrap();
        assert!(matches!(out.soft(), Some(Soft::NotFound { .. })));

        let updated = update_project(&mut cache, "work", "Job").unwrap().done().unwrap();
        assert_eq!(updated.id, "1");
        assert_eq!(updated.name, "Job");
        assert!(!cache.has_projects());
    }

    #[test]
    fn test_failed_create_and_update_keep_cache() {
        let remote = sample_remote();
        let mut cache = EntityCache::new(&remote);

        remote.fail_next("add_project");
        assert!(create_project(&mut cache, "Garage").is_err());
        assert!(cache.has_projects());

        remote.fail_next("update_project");
        assert!(update_project(&mut cache, "work", "Job").is_err());
        assert!(cache.has_projects());

        assert_eq!(remote.projects().len(), 2);
        assert_eq!(remote.projects()[0].name, "Work");
        assert_eq!(remote.calls("list_projects"), 1);
    }

    #[test]
    fn test_delete_partial_and_invalidation() {
        let remote = sample_remote();
        let mut cache = EntityCache::new(&remote);
        cache.sections("2").unwrap();
        cache.tasks(Some("2")).unwrap();
        cache.tasks(Some("1")).unwrap();

        let deleted = delete_project(&mut cache, "hom").unwrap().done().unwrap();
        assert_eq!(deleted.id, "2");
        assert!(!cache.has_projects());
        assert!(!cache.has_sections("2"));
        assert!(!cache.has_tasks(&TaskScope::Project("2".into())));
        assert!(cache.has_tasks(&TaskScope::Project("1".into())));
    }

    #[test]
    fn test_delete_prefers_exact_name() {
        let remote = FakeRemote::new();
        remote.add_project_row("1", "Home renovation");
        remote.add_project_row("2", "Home");
        let mut cache = EntityCache::new(&remote);
        let deleted = delete_project(&mut cache, "home").unwrap().done().unwrap();
        assert_eq!(deleted.id, "2");
    }

    #[test]
    fn test_delete_not_found_and_failure() {
        let remote = sample_remote();
        let mut cache = EntityCache::new(&remote);
        let out = delete_project(&mut cache, "garage").unwrap();
        assert!(out.soft().is_some());

        remote.fail_next("delete_project");
        assert!(delete_project(&mut cache, "work").is_err());
        assert!(cache.has_projects());
        assert_eq!(remote.projects().len(), 2);
    }
}
