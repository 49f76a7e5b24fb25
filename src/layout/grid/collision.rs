use super::item::GridLayoutItem;

/// Whether two items' cell rectangles intersect.
///
/// Cells are half-open, so items that only share an edge do not collide.
/// An item never collides with itself, and hidden or zero-sized items never
/// collide with anything.
pub fn collides(a: &GridLayoutItem, b: &GridLayoutItem) -> bool {
    if a.id == b.id {
        return false;
    }
    if !a.is_solid() || !b.is_solid() {
        return false;
    }
    a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
}

/// Index of the first item in `layout` that collides with `item`.
pub fn first_collision(layout: &[GridLayoutItem], item: &GridLayoutItem) -> Option<usize> {
    layout.iter().position(|other| collides(other, item))
}

/// Indices of every item in `layout` that collides with `item`, in layout order.
pub fn all_collisions(layout: &[GridLayoutItem], item: &GridLayoutItem) -> Vec<usize> {
    layout
        .iter()
        .enumerate()
        .filter(|(_, other)| collides(other, item))
        .map(|(index, _)| index)
        .collect()
}

pub fn statics(layout: &[GridLayoutItem]) -> Vec<GridLayoutItem> {
    layout.iter().filter(|item| item.is_static).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_collide() {
        let a = GridLayoutItem::new("a", 0, 0, 2, 2);
        let b = GridLayoutItem::new("b", 2, 0, 2, 2);
        let c = GridLayoutItem::new("c", 0, 2, 2, 2);
        assert!(!collides(&a, &b));
        assert!(!collides(&a, &c));
        assert!(collides(&a, &GridLayoutItem::new("d", 1, 1, 2, 2)));
    }

    #[test]
    fn same_id_never_collides() {
        let a = GridLayoutItem::new("a", 0, 0, 2, 2);
        assert!(!collides(&a, &a.clone()));
    }

    #[test]
    fn hidden_and_zero_sized_items_are_ignored() {
        let a = GridLayoutItem::new("a", 0, 0, 2, 2);
        let mut hidden = GridLayoutItem::new("b", 0, 0, 2, 2);
        hidden.is_hidden = true;
        let empty = GridLayoutItem::new("c", 0, 0, 0, 0);
        assert!(!collides(&a, &hidden));
        assert!(!collides(&a, &empty));
    }

    #[test]
    fn all_collisions_keeps_layout_order() {
        let layout = vec![
            GridLayoutItem::new("a", 0, 0, 1, 1),
            GridLayoutItem::new("b", 5, 5, 1, 1),
            GridLayoutItem::new("c", 1, 0, 1, 1),
        ];
        let candidate = GridLayoutItem::new("p", 0, 0, 2, 1);
        assert_eq!(all_collisions(&layout, &candidate), vec![0, 2]);
        assert_eq!(first_collision(&layout, &candidate), Some(0));
    }
}
