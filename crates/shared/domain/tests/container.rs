use serde_json::json;
use sponge_domain::{DataContainer, DataValue, ResourceKey};

#[test]
fn container_deserializes_from_json() {
    let raw = json!({
        "ContentVersion": 2,
        "Item": { "Type": "minecraft:stone", "Count": 12, "Damage": 0.5 },
        "Lore": ["first", "second"],
        "Unbreakable": true
    });

    let container: DataContainer = serde_json::from_value(raw).expect("container deserialize");
    assert_eq!(container.content_version(), Some(2));
    assert_eq!(container.get_int("Item.Count"), Some(12));
    assert_eq!(container.get_double("Item.Damage"), Some(0.5));
    assert_eq!(container.get_bool("Unbreakable"), Some(true));
    assert_eq!(
        container.get_list("Lore"),
        Some(&[DataValue::from("first"), DataValue::from("second")][..])
    );
    assert_eq!(container.keys().collect::<Vec<_>>(), ["ContentVersion", "Item", "Lore", "Unbreakable"]);
}

#[test]
fn container_serializes_back_to_the_same_shape() {
    let container = DataContainer::new().with("Item.Count", 3).with("Name", "stone");
    let value = serde_json::to_value(&container).expect("container serialize");
    assert_eq!(value, json!({ "Item": { "Count": 3 }, "Name": "stone" }));
}

#[test]
fn resource_keys_serialize_as_strings() {
    let key = ResourceKey::try_from("minecraft:item_stack").unwrap();
    let value = serde_json::to_value(&key).unwrap();
    assert_eq!(value, json!("minecraft:item_stack"));

    let parsed: ResourceKey = serde_json::from_value(json!("Player_Data")).unwrap();
    assert_eq!(parsed, ResourceKey::sponge("player_data").unwrap());
    assert!(serde_json::from_value::<ResourceKey>(json!("bad key")).is_err());
}
