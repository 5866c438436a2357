use crate::model::A2lObjectName;
use fnv::FnvBuildHasher;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::HashMap,
    ops::{Index, IndexMut},
};

/// A list of named a2l items
///
/// An ItemList keeps the items in the order of the input file and additionally
/// allows fast access to an item by its name.
/// In JSON it is represented as a plain array.
#[derive(Debug, Clone)]
pub struct ItemList<T: A2lObjectName> {
    items: Vec<T>,
    // item name -> index in items
    map: HashMap<String, usize, FnvBuildHasher>,
}

impl<T: A2lObjectName> ItemList<T> {
    /// create a new ItemList
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: vec![],
            map: HashMap::default(),
        }
    }

    /// create a new ItemList with a specified initial capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            map: HashMap::with_capacity_and_hasher(capacity, FnvBuildHasher::default()),
        }
    }

    /// append an item
    ///
    /// Duplicate names are allowed; name lookups return the first item with the name.
    pub fn push(&mut self, value: T) {
        let index = self.items.len();
        self.map
            .entry(value.get_name().to_string())
            .or_insert(index);
        self.items.push(value);
    }

    /// get an item by name
    pub fn get(&self, name: &str) -> Option<&T> {
        let index = self.map.get(name)?;
        self.items.get(*index)
    }

    /// get a mutable reference to an item by name
    ///
    /// The name of the item must not be changed through this reference.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let index = self.map.get(name)?;
        self.items.get_mut(*index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// get the position of an item by name
    pub fn index(&self, name: &str) -> Option<usize> {
        self.map.get(name).copied()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Returns an iterator over references to the items in the ItemList
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns an iterator over mutable references to the items in the ItemList
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Returns the number of items in the ItemList
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the ItemList is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// extend the ItemList from an iterator
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let into_iter = iter.into_iter();
        let (low, _high) = into_iter.size_hint();
        self.items.reserve(low);
        self.map.reserve(low);
        for item in into_iter {
            self.push(item);
        }
    }
}

impl<T> Default for ItemList<T>
where
    T: A2lObjectName,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: A2lObjectName> Index<usize> for ItemList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T: A2lObjectName> IndexMut<usize> for ItemList<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.items[index]
    }
}

impl<T> FromIterator<T> for ItemList<T>
where
    T: A2lObjectName,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut item_list = ItemList::new();
        item_list.extend(iter);
        item_list
    }
}

impl<T> IntoIterator for ItemList<T>
where
    T: A2lObjectName,
{
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ItemList<T>
where
    T: A2lObjectName,
{
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ItemList<T>
where
    T: A2lObjectName,
{
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

impl<T> PartialEq for ItemList<T>
where
    T: A2lObjectName + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        // the maps are derived from the items
        self.items == other.items
    }
}

impl<T> Serialize for ItemList<T>
where
    T: A2lObjectName + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

impl<'de, T> Deserialize<'de> for ItemList<T>
where
    T: A2lObjectName + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}

#[macro_export]
macro_rules! itemlist {
    () => (
        $crate::ItemList::new()
    );
    ($($x:expr),+ $(,)?) => (
        {
            const CAP: usize = <[()]>::len(&[$({ stringify!($x); }),*]);
            let mut itemlist = $crate::ItemList::with_capacity(CAP);
            $(
                itemlist.push($x);
            )*
            itemlist
        }
    );
}
