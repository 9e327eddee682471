use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use litellm_user_sdk::{UserAttributes, UserId, UserResourceClient, UserState};

use crate::state::{StateFile, StateStore};

fn read_attributes(path: &Path) -> Result<UserAttributes> {
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("invalid attributes in {}", path.display()))
}

fn print_state(name: &str, state: &UserState) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&BTreeMap::from([(name, state)]))?;
    println!("{rendered}");
    Ok(())
}

fn tracked_id(state: &StateFile, name: &str) -> Result<UserId> {
    state
        .resources
        .get(name)
        .and_then(|s| s.id.clone())
        .with_context(|| format!("no tracked user named {name:?}"))
}

fn ensure_untracked(state: &StateFile, name: &str) -> Result<()> {
    if let Some(UserState { id: Some(id), .. }) = state.resources.get(name) {
        bail!("{name:?} already tracks user {id}");
    }
    Ok(())
}

pub async fn create(
    client: &dyn UserResourceClient,
    store: &StateStore,
    name: &str,
    attributes: &Path,
) -> Result<()> {
    let mut state = store.load()?;
    ensure_untracked(&state, name)?;
    let desired = read_attributes(attributes)?;

    match client.create(&desired).await {
        Ok(created) => {
            state.resources.insert(name.to_owned(), created.clone());
            store.save(&state)?;
            print_state(name, &created)
        }
        Err(e) => {
            // the user exists remotely; keep tracking it so it is not leaked
            if let Some(orphan) = e.orphaned_user_id() {
                let id = UserId::new(orphan)?;
                tracing::warn!(user_id = %id, name, "create did not complete; tracking user anyway");
                state
                    .resources
                    .insert(name.to_owned(), UserState::new(id, desired));
                store.save(&state)?;
            }
            Err(e).context(format!("create {name:?} failed"))
        }
    }
}

pub async fn read(client: &dyn UserResourceClient, store: &StateStore, name: &str) -> Result<()> {
    let mut state = store.load()?;
    let Some(mut tracked) = state.resources.get(name).cloned() else {
        bail!("no tracked user named {name:?}");
    };

    client.refresh(&mut tracked).await?;

    if tracked.is_tracked() {
        state.resources.insert(name.to_owned(), tracked.clone());
        store.save(&state)?;
        print_state(name, &tracked)
    } else {
        state.resources.remove(name);
        store.save(&state)?;
        println!("{name}: user no longer exists; removed from state");
        Ok(())
    }
}

pub async fn update(
    client: &dyn UserResourceClient,
    store: &StateStore,
    name: &str,
    attributes: &Path,
) -> Result<()> {
    let mut state = store.load()?;
    let id = tracked_id(&state, name)?;
    let desired = read_attributes(attributes)?;

    let updated = client
        .update(&id, &desired)
        .await
        .with_context(|| format!("update {name:?} failed"))?;
    state.resources.insert(name.to_owned(), updated.clone());
    store.save(&state)?;
    print_state(name, &updated)
}

pub async fn delete(client: &dyn UserResourceClient, store: &StateStore, name: &str) -> Result<()> {
    let mut state = store.load()?;
    let id = tracked_id(&state, name)?;

    match client.delete(&id).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            tracing::info!(user_id = %id, name, "user already gone");
        }
        Err(e) => return Err(e).context(format!("delete {name:?} failed")),
    }

    state.resources.remove(name);
    store.save(&state)?;
    println!("{name}: deleted");
    Ok(())
}

pub async fn import(
    client: &dyn UserResourceClient,
    store: &StateStore,
    name: &str,
    id: &str,
) -> Result<()> {
    let mut state = store.load()?;
    ensure_untracked(&state, name)?;
    let id = UserId::new(id)?;

    let imported = client
        .import(&id)
        .await
        .with_context(|| format!("import {name:?} failed"))?;
    state.resources.insert(name.to_owned(), imported.clone());
    store.save(&state)?;
    print_state(name, &imported)
}

pub fn show(store: &StateStore) -> Result<()> {
    let state = store.load()?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
