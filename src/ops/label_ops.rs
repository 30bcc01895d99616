use crate::io::remote::RemoteError;
use crate::model::Label;
use crate::ops::cache::EntityCache;
use crate::ops::outcome::{EntityKind, Halt, Outcome, Soft, finish};
use crate::ops::resolve::{find_exact, find_exact_or_partial};

pub fn list_labels(cache: &mut EntityCache<'_>) -> Result<Vec<Label>, RemoteError> {
    let mut labels = cache.labels()?.to_vec();
    labels.sort_by_cached_key(|l| l.name.to_lowercase());
    Ok(labels)
}

pub fn create_label(cache: &mut EntityCache<'_>, name: &str) -> Result<Outcome<Label>, RemoteError> {
    finish(create_inner(cache, name))
}

fn create_inner(cache: &mut EntityCache<'_>, name: &str) -> Result<Label, Halt> {
    let labels = cache.labels()?;
    if let Some(existing) = find_exact(&labels[..], name) {
        return Err(Soft::Duplicate {
            kind: EntityKind::Label,
            name: existing.name.clone(),
            id: existing.id.clone(),
        }
        .into());
    }
    let label = cache.remote().add_label(name)?;
    log::info!("created label {}", label.id);
    cache.invalidate_labels();
    Ok(label)
}

pub fn update_label(
    cache: &mut EntityCache<'_>,
    name: &str,
    new_name: &str,
) -> Result<Outcome<Label>, RemoteError> {
    finish(update_inner(cache, name, new_name))
}

fn update_inner(cache: &mut EntityCache<'_>, name: &str, new_name: &str) -> Result<Label, Halt> {
    let labels = cache.labels()?;
    let target = find_exact(&labels[..], name).ok_or_else(|| Soft::NotFound {
        kind: EntityKind::Label,
        query: name.to_string(),
    })?;
    let updated = cache.remote().update_label(&target.id, new_name)?;
    log::info!("renamed label {}", updated.id);
    cache.invalidate_labels();
    Ok(updated)
}

/// Delete a label by exact name, falling back to the first partial match.
pub fn delete_label(cache: &mut EntityCache<'_>, name: &str) -> Result<Outcome<Label>, RemoteError> {
    finish(delete_inner(cache, name))
}

fn delete_inner(cache: &mut EntityCache<'_>, name: &str) -> Result<Label, Halt> {
    let labels = cache.labels()?;
    let target = find_exact_or_partial(&labels[..], name)
        .cloned()
        .ok_or_else(|| Soft::NotFound {
            kind: EntityKind::Label,
            query: name.to_string(),
        })?;
    cache.remote().delete_label(&target.id)?;
    log::info!("deleted label {}", target.id);
    cache.invalidate_labels();
    Ok(target)
}
