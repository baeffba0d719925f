//! Collision detection
//!
//! Pure geometry over droppable rectangles, so it runs and tests without a
//! DOM. Two detectors (pointer-within and rectangle-intersection) feed one
//! priority resolver.

/// Axis-aligned rectangle in viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Overlap area divided by the union area, 0.0 when disjoint
    pub fn intersection_ratio(&self, other: &Rect) -> f64 {
        let width = self.right().min(other.right()) - self.left.max(other.left);
        let height = self.bottom().min(other.bottom()) - self.top.max(other.top);
        if width <= 0.0 || height <= 0.0 {
            return 0.0;
        }
        let overlap = width * height;
        let union = self.area() + other.area() - overlap;
        if union <= 0.0 {
            0.0
        } else {
            overlap / union
        }
    }
}

/// Whether a droppable holds other draggables or is one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DroppableKind {
    Item,
    Container,
}

impl DroppableKind {
    pub fn from_attr(raw: &str) -> Self {
        if raw == "container" {
            DroppableKind::Container
        } else {
            DroppableKind::Item
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Droppable {
    pub id: String,
    pub kind: DroppableKind,
    pub rect: Rect,
}

/// Droppables under the pointer, in input order
pub fn pointer_within<'a>(x: f64, y: f64, droppables: &'a [Droppable]) -> Vec<&'a Droppable> {
    droppables.iter().filter(|d| d.rect.contains(x, y)).collect()
}

/// Droppables overlapping the dragged rectangle, largest overlap first
pub fn rect_intersection<'a>(active: &Rect, droppables: &'a [Droppable]) -> Vec<&'a Droppable> {
    let mut hits: Vec<(f64, &Droppable)> = droppables
        .iter()
        .map(|d| (active.intersection_ratio(&d.rect), d))
        .filter(|(ratio, _)| *ratio > 0.0)
        .collect();
    hits.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    hits.into_iter().map(|(_, d)| d).collect()
}

/// Pick the drop candidate.
///
/// Priority: item under the pointer, container under the pointer, container
/// overlapping the dragged rect, item overlapping the dragged rect, then the
/// first hit of either detector. The dragged element itself is never a
/// candidate.
pub fn resolve_collision(
    pointer: (f64, f64),
    active: &Rect,
    active_id: &str,
    droppables: &[Droppable],
) -> Option<String> {
    let candidates: Vec<Droppable> = droppables
        .iter()
        .filter(|d| d.id != active_id)
        .cloned()
        .collect();
    let by_pointer = pointer_within(pointer.0, pointer.1, &candidates);
    let by_rect = rect_intersection(active, &candidates);

    let of_kind = |hits: &[&Droppable], kind: DroppableKind| {
        hits.iter().find(|d| d.kind == kind).map(|d| d.id.clone())
    };

    of_kind(&by_pointer, DroppableKind::Item)
        .or_else(|| of_kind(&by_pointer, DroppableKind::Container))
        .or_else(|| of_kind(&by_rect, DroppableKind::Container))
        .or_else(|| of_kind(&by_rect, DroppableKind::Item))
        // Unreachable while every droppable is an Item or a Container; only
        // matters once a third kind exists
        .or_else(|| by_pointer.first().or(by_rect.first()).map(|d| d.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn droppable(id: &str, kind: DroppableKind, rect: Rect) -> Droppable {
        Droppable {
            id: id.to_string(),
            kind,
            rect,
        }
    }

    fn board() -> Vec<Droppable> {
        vec![
            droppable("cell:S:-", DroppableKind::Container, Rect::new(0.0, 0.0, 300.0, 100.0)),
            droppable("card:c1", DroppableKind::Item, Rect::new(10.0, 10.0, 80.0, 80.0)),
            droppable("card:c2", DroppableKind::Item, Rect::new(100.0, 10.0, 80.0, 80.0)),
            droppable("unranked", DroppableKind::Container, Rect::new(0.0, 200.0, 300.0, 100.0)),
        ]
    }

    #[test]
    fn test_intersection_ratio() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection_ratio(&Rect::new(20.0, 0.0, 10.0, 10.0)), 0.0);
        assert_eq!(a.intersection_ratio(&a), 1.0);
        let half = a.intersection_ratio(&Rect::new(5.0, 0.0, 10.0, 10.0));
        assert!((half - 50.0 / 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_card_under_pointer_wins_over_container() {
        let active = Rect::new(90.0, 20.0, 80.0, 80.0);
        let hit = resolve_collision((120.0, 40.0), &active, "card:c1", &board());
        assert_eq!(hit.as_deref(), Some("card:c2"));
    }

    #[test]
    fn test_container_under_pointer_when_no_card() {
        let active = Rect::new(190.0, 20.0, 80.0, 80.0);
        let hit = resolve_collision((250.0, 50.0), &active, "card:c1", &board());
        assert_eq!(hit.as_deref(), Some("cell:S:-"));
    }

    #[test]
    fn test_rect_overlap_prefers_containers() {
        // Pointer in the gap between rows, dragged rect overlaps the pool
        let active = Rect::new(10.0, 150.0, 80.0, 80.0);
        let hit = resolve_collision((50.0, 150.0), &active, "card:c1", &board());
        assert_eq!(hit.as_deref(), Some("unranked"));
    }

    #[test]
    fn test_rect_overlap_falls_back_to_items() {
        let items = vec![droppable("card:c2", DroppableKind::Item, Rect::new(100.0, 10.0, 80.0, 80.0))];
        let active = Rect::new(60.0, 10.0, 80.0, 80.0);
        let hit = resolve_collision((20.0, 20.0), &active, "card:c1", &items);
        assert_eq!(hit.as_deref(), Some("card:c2"));
    }

    #[test]
    fn test_dragged_element_is_ignored() {
        let active = Rect::new(10.0, 10.0, 80.0, 80.0);
        let hit = resolve_collision((50.0, 50.0), &active, "card:c1", &board());
        assert_eq!(hit.as_deref(), Some("cell:S:-"));
    }

    #[test]
    fn test_nothing_hit() {
        let active = Rect::new(1000.0, 1000.0, 10.0, 10.0);
        assert_eq!(resolve_collision((1005.0, 1005.0), &active, "card:c1", &board()), None);
    }
}
