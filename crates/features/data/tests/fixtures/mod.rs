#![allow(dead_code)]

use sponge_data::{ContentUpdater, DataBuilder, DataError, DataManager, VersionedDataBuilder};
use sponge_domain::{BuilderCapabilities, DataContainer, DataValue, ResourceKey};

pub const BANNER_VERSION: i32 = 1;

pub fn key(raw: &str) -> ResourceKey {
    ResourceKey::try_from(raw).unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub title: String,
    pub layers: i64,
}

/// Reads `Title` and `Layers` without looking at the content version.
pub struct BannerBuilder;

impl DataBuilder<Banner> for BannerBuilder {
    fn build(&self, _: &DataManager, container: &DataContainer) -> Result<Banner, DataError> {
        read_banner(container)
    }
}

/// Same as [`BannerBuilder`] but advertises itself as immutable.
pub struct FrozenBannerBuilder;

impl DataBuilder<Banner> for FrozenBannerBuilder {
    fn build(&self, _: &DataManager, container: &DataContainer) -> Result<Banner, DataError> {
        read_banner(container)
    }

    fn capabilities(&self) -> BuilderCapabilities {
        BuilderCapabilities::IMMUTABLE
    }
}

/// Always answers with `title`, to tell registered builders apart.
pub struct NamedBuilder(pub &'static str);

impl DataBuilder<Banner> for NamedBuilder {
    fn build(&self, _: &DataManager, _: &DataContainer) -> Result<Banner, DataError> {
        Ok(Banner { title: self.0.to_owned(), layers: 0 })
    }
}

pub struct CountBuilder;

impl DataBuilder<i64> for CountBuilder {
    fn build(&self, _: &DataManager, container: &DataContainer) -> Result<i64, DataError> {
        container.get_int("Count").ok_or_else(|| DataError::invalid_data("missing Count"))
    }
}

pub fn read_banner(container: &DataContainer) -> Result<Banner, DataError> {
    let title = container.get_string("Title").ok_or_else(|| DataError::invalid_data("missing Title"))?;
    let layers = container.get_int("Layers").ok_or_else(|| DataError::invalid_data("missing Layers"))?;
    Ok(Banner { title: title.to_owned(), layers })
}

pub fn versioned_banner_builder() -> VersionedDataBuilder<Banner> {
    VersionedDataBuilder::new(key("banner"), BANNER_VERSION, |_, container| read_banner(container))
}

/// Banner schema history: v3 used `Name`, v2 renamed it to `Title`, v1 turned the
/// `Patterns` list into a `Layers` count.
pub fn register_banner_updaters(manager: &mut DataManager) {
    manager.register_content_updater(
        key("banner"),
        ContentUpdater::new(3, 2, |mut content: DataContainer| {
            let name = content.remove("Name").ok_or_else(|| DataError::invalid_data("missing Name"))?;
            content.set("Title", name);
            Ok(content)
        }),
    );
    manager.register_content_updater(
        key("banner"),
        ContentUpdater::new(2, 1, |mut content: DataContainer| {
            let layers = content.get_list("Patterns").map_or(0, <[DataValue]>::len);
            content.remove("Patterns");
            content.set("Layers", i64::try_from(layers).unwrap_or(i64::MAX));
            Ok(content)
        }),
    );
}

/// Updater that appends its input version to the `Trail` list.
pub fn trail_updater(input: i32, output: i32) -> ContentUpdater {
    ContentUpdater::new(input, output, move |mut content: DataContainer| {
        let mut trail = content.get_list("Trail").map(<[DataValue]>::to_vec).unwrap_or_default();
        trail.push(DataValue::from(input));
        content.set("Trail", trail);
        Ok(content)
    })
}

pub fn trail(content: &DataContainer) -> Vec<i64> {
    content
        .get_list("Trail")
        .unwrap_or_default()
        .iter()
        .filter_map(DataValue::as_int)
        .collect()
}
