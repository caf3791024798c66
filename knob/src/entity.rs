//! Entities: named bundles of properties, actions and events
//!
//! ```
//! # use knob::{Action, Entity, Property};
//! let lamp = Entity::builder("living_room.lamp")
//!     .property("brightness", Property::read_only(|_| async { Ok(0.8) }))
//!     .action("toggle", Action::new(|(), _| async { Ok(()) }))
//!     .build()
//!     .unwrap();
//!
//! assert!(lamp.property::<f64>("brightness").is_some());
//! assert!(lamp.property::<String>("brightness").is_none());
//! assert!(lamp.action::<(), ()>("toggle").is_some());
//! ```

use core::{any::Any, fmt};
use std::collections::{BTreeMap, btree_map::Entry};

use knob_common::{EntityId, KnobString};

use crate::{Action, Error, Event, Property, Result};

/// Values of mixed types under unique string keys
pub struct NamedMap {
    kind: &'static str,
    entries: BTreeMap<KnobString, Box<dyn Any + Send + Sync>>,
}

pub type PropertyMap = NamedMap;
pub type ActionMap = NamedMap;
pub type EventMap = NamedMap;

impl NamedMap {
    /// `kind` names the map in errors, eg. `"property"`.
    pub fn new(kind: &'static str) -> Self {
        Self { kind, entries: BTreeMap::new() }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn insert<T: Any + Send + Sync>(
        &mut self,
        key: impl Into<KnobString>,
        value: T,
    ) -> Result<()> {
        match self.entries.entry(key.into()) {
            Entry::Vacant(entry) => {
                entry.insert(Box::new(value));
                Ok(())
            }
            Entry::Occupied(entry) => Err(Error::DuplicateKey {
                kind: self.kind,
                key: entry.key().clone(),
            }),
        }
    }

    /// `None` if there's nothing under `key`, or if it isn't a `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(KnobString::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for NamedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedMap")
            .field("kind", &self.kind)
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    properties: PropertyMap,
    actions: ActionMap,
    events: EventMap,
}

impl Entity {
    pub fn builder(id: impl Into<EntityId>) -> EntityBuilder {
        EntityBuilder {
            entity: Entity {
                id: id.into(),
                properties: NamedMap::new("property"),
                actions: NamedMap::new("action"),
                events: NamedMap::new("event"),
            },
            error: None,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn property<V: Send + 'static>(&self, key: &str) -> Option<Property<V>> {
        self.properties.get::<Property<V>>(key).cloned()
    }

    pub fn action<A: Send + 'static, R: Send + 'static>(&self, key: &str) -> Option<Action<A, R>> {
        self.actions.get::<Action<A, R>>(key).cloned()
    }

    pub fn event<T: Send + 'static>(&self, key: &str) -> Option<Event<T>> {
        self.events.get::<Event<T>>(key).cloned()
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn actions(&self) -> &ActionMap {
        &self.actions
    }

    pub fn events(&self) -> &EventMap {
        &self.events
    }

    pub fn property_keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys()
    }

    pub fn action_keys(&self) -> impl Iterator<Item = &str> {
        self.actions.keys()
    }

    pub fn event_keys(&self) -> impl Iterator<Item = &str> {
        self.events.keys()
    }
}

/// See [`Entity::builder`]. The first failed insertion is reported by [`build`](Self::build).
pub struct EntityBuilder {
    entity: Entity,
    error: Option<Error>,
}

impl EntityBuilder {
    pub fn property<V: Send + 'static>(
        mut self,
        key: impl Into<KnobString>,
        property: Property<V>,
    ) -> Self {
        let result = self.entity.properties.insert(key, property);
        self.record(result)
    }

    pub fn action<A: Send + 'static, R: Send + 'static>(
        mut self,
        key: impl Into<KnobString>,
        action: Action<A, R>,
    ) -> Self {
        let result = self.entity.actions.insert(key, action);
        self.record(result)
    }

    pub fn event<T: Send + 'static>(mut self, key: impl Into<KnobString>, event: Event<T>) -> Self {
        let result = self.entity.events.insert(key, event);
        self.record(result)
    }

    pub fn build(self) -> Result<Entity> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.entity),
        }
    }

    fn record(mut self, result: Result<()>) -> Self {
        if self.error.is_none() {
            self.error = result.err();
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use futures::{StreamExt as _, stream};

    use super::*;
    use crate::{CancellationToken, Observer};

    fn thermostat() -> EntityBuilder {
        Entity::builder("hallway.thermostat")
            .property("target", Property::read_only(|_| async { Ok(21.5) }))
            .property("mode", Property::read_only(|_| async { Ok("heat".to_owned()) }))
            .action("boost", Action::new(|minutes: u32, _| async move { Ok(minutes * 60) }))
            .event("button", Observer::new(|_| stream::iter([Ok(1u8), Ok(2)])))
    }

    #[tokio::test]
    async fn typed_lookup() {
        let entity = thermostat().build().unwrap();

        assert_eq!(entity.id().as_str(), "hallway.thermostat");

        let target = entity.property::<f64>("target").unwrap();
        assert_eq!(target.get(None).await.unwrap(), 21.5);
        assert_eq!(entity.property::<String>("mode").unwrap().get(None).await.unwrap(), "heat");

        let boost = entity.action::<u32, u32>("boost").unwrap();
        assert_eq!(boost.invoke(2, None).await.unwrap(), 120);

        let presses = entity.event::<u8>("button").unwrap();
        let presses = presses.open(&CancellationToken::new()).collect::<Vec<_>>().await;
        assert_eq!(presses.len(), 2);
    }

    #[test]
    fn wrong_type_or_key() {
        let entity = thermostat().build().unwrap();

        assert!(entity.property::<f32>("target").is_none());
        assert!(entity.property::<f64>("setpoint").is_none());
        assert!(entity.action::<(), ()>("boost").is_none());
        assert!(entity.event::<u8>("target").is_none());
    }

    #[test]
    fn keys() {
        let entity = thermostat().build().unwrap();

        assert_eq!(entity.property_keys().collect::<Vec<_>>(), ["mode", "target"]);
        assert_eq!(entity.action_keys().collect::<Vec<_>>(), ["boost"]);
        assert_eq!(entity.event_keys().collect::<Vec<_>>(), ["button"]);
        assert_eq!(entity.properties().len(), 2);
        assert!(entity.events().contains_key("button"));
        assert_eq!(entity.actions().kind(), "action");
    }

    #[test]
    fn duplicate_keys() {
        let err = thermostat()
            .property("target", Property::<f64>::default())
            .property("mode", Property::<f64>::default())
            .build()
            .unwrap_err();

        match err {
            Error::DuplicateKey { kind, key } => {
                assert_eq!(kind, "property");
                assert_eq!(key, "target");
            }
            e => panic!("unexpected error: {e}"),
        }

        // the same key may be used once per collection
        let entity = Entity::builder("x")
            .property("power", Property::<bool>::default())
            .action("power", Action::new(|on: bool, _| async move { Ok(on) }))
            .build()
            .unwrap();
        assert!(entity.property::<bool>("power").is_some());
        assert!(entity.action::<bool, bool>("power").is_some());
    }

    #[test]
    fn debug_lists_keys() {
        let entity = Entity::builder("x")
            .property("a", Property::<i32>::default())
            .build()
            .unwrap();

        assert!(format!("{entity:?}").contains(r#"keys: ["a"]"#));
    }
}
