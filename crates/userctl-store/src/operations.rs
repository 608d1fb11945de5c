use std::io::Write;

use tracing::{debug, info};
use userctl_output::{format_already_exists, format_not_found, format_user};
use userctl_types::{find_by_id, position_by_id, Arguments, Operation, UnknownOperation, User};

use crate::error::StoreError;
use crate::store::UserStore;

/// Validates `args` and runs the requested operation, writing any result to `writer`.
pub fn perform<W: Write>(args: &Arguments, writer: &mut W) -> Result<(), StoreError> {
    let operation = args.operation().ok_or(StoreError::MissingOperation)?;
    let file_name = args.file_name().ok_or(StoreError::MissingFileName)?;
    let operation: Operation = operation
        .parse()
        .map_err(|UnknownOperation(name)| StoreError::UnknownOperation(name))?;

    debug!("Performing {} on {}", operation, file_name);
    let store = UserStore::new(file_name);

    match operation {
        Operation::List => list_users(&store, writer),
        Operation::Add => {
            let item = args.item().ok_or(StoreError::MissingItem)?;
            add_user(&store, item, writer)
        }
        Operation::FindById => {
            let id = args.id().ok_or(StoreError::MissingId)?;
            find_user_by_id(&store, id, writer)
        }
        Operation::Remove => {
            let id = args.id().ok_or(StoreError::MissingId)?;
            remove_user(&store, id, writer)
        }
    }
}

/// Copies the store file to `writer` byte for byte.
pub fn list_users<W: Write>(store: &UserStore, writer: &mut W) -> Result<(), StoreError> {
    let bytes = store.read_raw()?;
    writer.write_all(&bytes).map_err(StoreError::Output)
}

pub fn add_user<W: Write>(
    store: &UserStore,
    item: &str,
    writer: &mut W,
) -> Result<(), StoreError> {
    let new_user: User = serde_json::from_str(item).map_err(StoreError::InvalidItem)?;

    let _lock = store.lock()?;
    let mut users = store.load()?;

    if find_by_id(&users, &new_user.id).is_some() {
        info!("User {} already exists, nothing written", new_user.id);
        return write_message(writer, &format_already_exists(&new_user.id));
    }

    info!("Adding user {}", new_user.id);
    users.push(new_user);
    store.save(&users)
}

/// Writes the matching user as JSON. Writes nothing when no user matches.
pub fn find_user_by_id<W: Write>(
    store: &UserStore,
    id: &str,
    writer: &mut W,
) -> Result<(), StoreError> {
    let _lock = store.lock()?;
    let users = store.load()?;

    let Some(user) = find_by_id(&users, id) else {
        debug!("No user with id {}", id);
        return Ok(());
    };

    let data = format_user(user).map_err(StoreError::Encode)?;
    writer.write_all(&data).map_err(StoreError::Output)
}

pub fn remove_user<W: Write>(
    store: &UserStore,
    id: &str,
    writer: &mut W,
) -> Result<(), StoreError> {
    let _lock = store.lock()?;
    let mut users = store.load()?;

    let Some(index) = position_by_id(&users, id) else {
        info!("User {} not found, nothing removed", id);
        return write_message(writer, &format_not_found(id));
    };

    info!("Removing user {}", id);
    users.remove(index);
    store.recreate(&users)
}

fn write_message<W: Write>(writer: &mut W, message: &str) -> Result<(), StoreError> {
    writer.write_all(message.as_bytes()).map_err(StoreError::Output)
}
