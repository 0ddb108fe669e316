use super::{Geometry, Point};
use crate::result::{Error, Result};

/// A type that can be stored in one of the geometry collections.
///
/// Typed mutators such as [`LineString::push`](super::LineString::push) are checked by the
/// compiler, the dynamic ones (`set`, `try_push`, `from_geometries`) go through
/// [`CollectionItem::from_geometry`] so that a collection of points never ends up holding
/// a line string.
pub trait CollectionItem: Clone + Into<Geometry> {
    /// Name used in error messages, e.g. `Point`.
    const TYPE_NAME: &'static str;

    /// Recover the item from a generic geometry, handing the geometry back when its
    /// variant is not accepted.
    fn from_geometry(geometry: Geometry) -> std::result::Result<Self, Geometry>;

    /// Structural comparison that does not look at any SRID.
    fn same_shape(&self, other: &Self) -> bool;
}

/// Collections whose items are points (`LineString` and `MultiPoint`).
pub trait PointCollection {
    fn points(&self) -> &[Point];

    /// Insert a point before `index`, `index` must address an existing point.
    fn insert_point(&mut self, index: usize, point: Point) -> Result<()>;

    fn prepend_point(&mut self, point: Point);

    fn append_point(&mut self, point: Point);

    /// The points rendered as `x1 y1,x2 y2,...`.
    fn to_pair_list(&self) -> String {
        self.points()
            .iter()
            .map(Point::to_pair)
            .collect::<Vec<String>>()
            .join(",")
    }
}

pub(crate) fn check_count(collection: &'static str, minimum: usize, len: usize) -> Result<()> {
    if len < minimum {
        return Err(Error::InvalidItemCount {
            collection,
            minimum,
        });
    }
    Ok(())
}

pub(crate) fn check_type<T: CollectionItem>(collection: &'static str, item: Geometry) -> Result<T> {
    T::from_geometry(item).map_err(|rejected| Error::InvalidItemType {
        collection,
        expected: T::TYPE_NAME,
        found: rejected.kind().name(),
    })
}

// Every collection type is a struct with `items` and `srid` fields. This generates
// the constructors, accessors and mutators they share.
macro_rules! impl_collection {
    ($t:ident, $item:ty, $min:expr) => {
        impl $t {
            /// The minimum number of items required to create this collection.
            pub const MINIMUM_ITEMS: usize = $min;

            pub fn new(items: Vec<$item>) -> $crate::result::Result<Self> {
                Self::with_srid(items, 0)
            }

            pub fn with_srid(items: Vec<$item>, srid: u32) -> $crate::result::Result<Self> {
                $crate::geometry::collection::check_count(stringify!($t), $min, items.len())?;
                Ok($t { items, srid })
            }

            /// Build the collection from generic geometries, checking the variant of each one.
            pub fn from_geometries(
                items: Vec<$crate::geometry::Geometry>,
                srid: u32,
            ) -> $crate::result::Result<Self> {
                let items = items
                    .into_iter()
                    .map(|g| $crate::geometry::collection::check_type::<$item>(stringify!($t), g))
                    .collect::<$crate::result::Result<Vec<$item>>>()?;
                Self::with_srid(items, srid)
            }

            pub fn srid(&self) -> u32 {
                self.srid
            }

            pub fn set_srid(&mut self, srid: u32) {
                self.srid = srid;
            }

            pub fn len(&self) -> usize {
                self.items.len()
            }

            pub fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.items.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.items.iter()
            }

            pub fn into_items(self) -> Vec<$item> {
                self.items
            }

            /// Replace the item at `index`, returning the previous one.
            pub fn set(
                &mut self,
                index: usize,
                item: impl Into<$crate::geometry::Geometry>,
            ) -> $crate::result::Result<$item> {
                let item = $crate::geometry::collection::check_type::<$item>(
                    stringify!($t),
                    item.into(),
                )?;
                let len = self.items.len();
                match self.items.get_mut(index) {
                    Some(slot) => Ok(std::mem::replace(slot, item)),
                    None => Err($crate::result::Error::IndexOutOfBounds { index, len }),
                }
            }

            pub fn push(&mut self, item: $item) {
                self.items.push(item);
            }

            pub fn try_push(
                &mut self,
                item: impl Into<$crate::geometry::Geometry>,
            ) -> $crate::result::Result<()> {
                let item = $crate::geometry::collection::check_type::<$item>(
                    stringify!($t),
                    item.into(),
                )?;
                self.items.push(item);
                Ok(())
            }

            pub fn insert(&mut self, index: usize, item: $item) -> $crate::result::Result<()> {
                if index > self.items.len() {
                    return Err($crate::result::Error::IndexOutOfBounds {
                        index,
                        len: self.items.len(),
                    });
                }
                self.items.insert(index, item);
                Ok(())
            }

            /// Remove the item at `index`, refusing to go below the minimum item count.
            pub fn remove(&mut self, index: usize) -> $crate::result::Result<$item> {
                let len = self.items.len();
                if index >= len {
                    return Err($crate::result::Error::IndexOutOfBounds { index, len });
                }
                $crate::geometry::collection::check_count(stringify!($t), $min, len - 1)?;
                Ok(self.items.remove(index))
            }

            pub(crate) fn same_items(&self, other: &Self) -> bool {
                use $crate::geometry::CollectionItem;
                self.items.len() == other.items.len()
                    && self
                        .items
                        .iter()
                        .zip(other.items.iter())
                        .all(|(a, b)| a.same_shape(b))
            }
        }

        impl PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                self.srid == other.srid && self.same_items(other)
            }
        }

        impl std::ops::Index<usize> for $t {
            type Output = $item;

            fn index(&self, index: usize) -> &$item {
                &self.items[index]
            }
        }

        impl IntoIterator for $t {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $t {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.iter()
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_wkt())
            }
        }
    };
}

pub(crate) use impl_collection;

// point collections share their insertion helpers
macro_rules! impl_point_collection {
    ($t:ident) => {
        impl $crate::geometry::PointCollection for $t {
            fn points(&self) -> &[$crate::geometry::Point] {
                &self.items
            }

            fn insert_point(
                &mut self,
                index: usize,
                point: $crate::geometry::Point,
            ) -> $crate::result::Result<()> {
                if index >= self.items.len() {
                    return Err($crate::result::Error::IndexOutOfBounds {
                        index,
                        len: self.items.len(),
                    });
                }
                self.items.insert(index, point);
                Ok(())
            }

            fn prepend_point(&mut self, point: $crate::geometry::Point) {
                self.items.insert(0, point);
            }

            fn append_point(&mut self, point: $crate::geometry::Point) {
                self.items.push(point);
            }
        }
    };
}

pub(crate) use impl_point_collection;
