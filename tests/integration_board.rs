use std::cell::RefCell;
use std::rc::Rc;

use dnd_layout::container::{FlexContainer, GridContainer, LayoutEvent};
use dnd_layout::coordinator::{AcceptsDrop, DropZoneHandler, LayoutItem};
use dnd_layout::geometry::{Point, Rect};
use dnd_layout::layout::flex::{FlexConfig, FlexLayoutItem, is_dense};
use dnd_layout::layout::grid::{GridConfig, GridLayoutItem};
use dnd_layout::{Board, BoardEvent, ContainerEvent, CrossContainerConfig};

// Cells are 10x10 pixels with no margins, so cell (x, y) starts at
// (10x, 10y) inside its container.
fn grid_config() -> GridConfig {
    GridConfig {
        columns: 12,
        row_height: 10.0,
        width: 120.0,
        margin: [0.0, 0.0],
        container_padding: Some([0.0, 0.0]),
        ..GridConfig::default()
    }
}

const LEFT: Rect = Rect::new(0.0, 0.0, 120.0, 100.0);
const RIGHT: Rect = Rect::new(200.0, 0.0, 120.0, 100.0);
const SHELF: Rect = Rect::new(0.0, 150.0, 200.0, 10.0);

fn two_grids(right_accepts: AcceptsDrop) -> Board {
    let mut board = Board::new();
    let left = GridContainer::new(
        "left",
        grid_config(),
        vec![
            GridLayoutItem::new("a", 0, 0, 2, 2),
            GridLayoutItem::new("b", 0, 2, 2, 2),
            GridLayoutItem::new("pinned", 4, 0, 2, 2),
        ],
    )
    .unwrap();
    let right = GridContainer::new(
        "right",
        grid_config(),
        vec![GridLayoutItem::new("r", 0, 0, 2, 2)],
    )
    .unwrap();
    board
        .mount_grid(left, LEFT, CrossContainerConfig::default())
        .unwrap();
    board
        .mount_grid(
            right,
            RIGHT,
            CrossContainerConfig {
                accepts: right_accepts,
                ..CrossContainerConfig::default()
            },
        )
        .unwrap();
    board
}

fn positions(board: &Board, grid: &str) -> Vec<(String, i32, i32)> {
    board
        .grid(grid)
        .unwrap()
        .layout()
        .iter()
        .map(|item| (item.id.clone(), item.x, item.y))
        .collect()
}

fn has_drop(events: &[BoardEvent], container: &str, item: &str) -> bool {
    events.iter().any(|event| {
        event.container == container
            && match &event.event {
                ContainerEvent::Grid(LayoutEvent::Drop { item: dropped, .. }) => dropped.id == item,
                ContainerEvent::Flex(LayoutEvent::Drop { item: dropped, .. }) => dropped.id == item,
                _ => false,
            }
    })
}

#[test]
fn grid_to_grid_transfer_moves_the_item() {
    let mut board = two_grids(AcceptsDrop::Always);

    assert!(board.pointer_down(Point::new(5.0, 5.0)));
    assert!(board.drop_state("left").is_source);
    board.pointer_move(Point::new(255.0, 5.0));

    // The source collapses the dragged item while the target previews it.
    assert_eq!(board.grid("left").unwrap().item("b").map(|b| b.y), Some(0));
    let preview = board.grid("right").unwrap().external_placeholder().cloned();
    assert_eq!(preview.map(|p| (p.x, p.y, p.w, p.h)), Some((5, 0, 2, 2)));
    assert!(board.drop_state("right").is_active);

    board.pointer_up(Point::new(255.0, 5.0));

    assert_eq!(
        positions(&board, "left"),
        vec![("b".to_string(), 0, 0), ("pinned".to_string(), 4, 0)]
    );
    let a = board.grid("right").unwrap().item("a").cloned().unwrap();
    assert_eq!((a.x, a.y, a.w, a.h), (5, 0, 2, 2));
    assert!(board.grid("right").unwrap().external_placeholder().is_none());
    assert!(!board.coordinator().is_dragging());
    assert!(!board.is_gesture_active());

    let events = board.take_events();
    assert!(has_drop(&events, "right", "a"));
}

#[test]
fn release_outside_every_target_restores_the_source() {
    let mut board = two_grids(AcceptsDrop::Always);
    let before_left = board.grid("left").unwrap().layout().to_vec();
    let before_right = board.grid("right").unwrap().layout().to_vec();

    assert!(board.pointer_down(Point::new(5.0, 5.0)));
    board.pointer_move(Point::new(255.0, 5.0));
    board.pointer_move(Point::new(160.0, 50.0));
    board.pointer_up(Point::new(160.0, 50.0));

    assert_eq!(board.grid("left").unwrap().layout(), before_left.as_slice());
    assert_eq!(board.grid("right").unwrap().layout(), before_right.as_slice());
    assert!(!has_drop(&board.take_events(), "right", "a"));
}

#[test]
fn rejecting_target_is_never_previewed() {
    let mut board = two_grids(AcceptsDrop::when(|item, _| item.id() != "pinned"));
    let before_right = board.grid("right").unwrap().layout().to_vec();

    assert!(board.pointer_down(Point::new(45.0, 5.0)));
    board.pointer_move(Point::new(255.0, 5.0));
    assert_eq!(board.coordinator().hovered_target(), None);
    assert!(board.grid("right").unwrap().external_placeholder().is_none());

    board.pointer_up(Point::new(255.0, 5.0));
    assert_eq!(board.grid("right").unwrap().layout(), before_right.as_slice());
    assert!(board.grid("left").unwrap().item("pinned").is_some());
}

#[derive(Clone, Default)]
struct Trash {
    calls: Rc<RefCell<Vec<String>>>,
}

impl DropZoneHandler for Trash {
    fn on_drag_enter(&mut self, item: &LayoutItem, _pointer: Point) {
        self.calls.borrow_mut().push(format!("enter {}", item.id()));
    }

    fn on_drag_over(&mut self, _item: &LayoutItem, _pointer: Point) {
        self.calls.borrow_mut().push("over".into());
    }

    fn on_drag_leave(&mut self, item: &LayoutItem) {
        self.calls.borrow_mut().push(format!("leave {}", item.id()));
    }

    fn on_drop(&mut self, item: &LayoutItem, _pointer: Point) {
        self.calls.borrow_mut().push(format!("drop {}", item.id()));
    }
}

#[test]
fn trash_zone_sees_one_enter_per_visit_and_takes_the_drop() {
    let mut board = two_grids(AcceptsDrop::Always);
    let trash = Trash::default();
    let calls = trash.calls.clone();
    board
        .mount_drop_zone("trash", Rect::new(0.0, 120.0, 60.0, 20.0), AcceptsDrop::Always, trash)
        .unwrap();

    assert!(board.pointer_down(Point::new(5.0, 25.0)));
    board.pointer_move(Point::new(10.0, 125.0));
    board.pointer_move(Point::new(20.0, 130.0));
    board.pointer_move(Point::new(100.0, 130.0));
    board.pointer_move(Point::new(20.0, 130.0));
    board.pointer_up(Point::new(20.0, 130.0));

    assert_eq!(
        *calls.borrow(),
        vec!["enter b", "over", "leave b", "enter b", "over", "drop b"]
    );
    assert!(board.grid("left").unwrap().item("b").is_none());
    let events = board.take_events();
    assert!(events.iter().any(|event| event.container == "trash"
        && matches!(&event.event, ContainerEvent::ExternalDrop { item, .. } if item.id() == "b")));
}

#[test]
fn unmounting_the_source_mid_drag_clears_every_preview() {
    let mut board = two_grids(AcceptsDrop::Always);
    let before_right = board.grid("right").unwrap().layout().to_vec();

    assert!(board.pointer_down(Point::new(5.0, 5.0)));
    board.pointer_move(Point::new(255.0, 5.0));
    assert!(board.grid("right").unwrap().external_placeholder().is_some());

    let removed = board.unmount("left").unwrap();
    assert!(removed.is_some());
    assert!(!board.coordinator().is_dragging());
    assert!(!board.is_gesture_active());
    assert!(board.grid("right").unwrap().external_placeholder().is_none());
    assert_eq!(board.grid("right").unwrap().layout(), before_right.as_slice());

    // Later pointer input has nothing to act on.
    board.pointer_move(Point::new(260.0, 5.0));
    board.pointer_up(Point::new(260.0, 5.0));
    assert_eq!(board.grid("right").unwrap().layout(), before_right.as_slice());
}

#[test]
fn grid_item_lands_in_flex_row_at_the_pointer_slot() {
    let mut board = two_grids(AcceptsDrop::Always);
    let shelf = FlexContainer::new(
        "shelf",
        FlexConfig::default(),
        vec![
            FlexLayoutItem::new("f0", 0).with_basis(20.0),
            FlexLayoutItem::new("f1", 1).with_basis(20.0),
        ],
    )
    .unwrap();
    board
        .mount_flex(shelf, SHELF, CrossContainerConfig::default())
        .unwrap();

    assert!(board.pointer_down(Point::new(5.0, 5.0)));
    board.pointer_move(Point::new(1.0, 155.0));
    assert!(board.flex("shelf").unwrap().has_external_item());

    // The placeholder is measured once the row has been laid out with it.
    board.on_frame();
    board.on_frame();
    board.pointer_move(Point::new(2.0, 155.0));
    board.pointer_up(Point::new(2.0, 155.0));

    let shelf = board.flex("shelf").unwrap();
    assert!(!shelf.has_external_item());
    assert!(is_dense(shelf.layout()));
    let orders: Vec<(&str, i32)> = shelf
        .layout()
        .iter()
        .map(|item| (item.id.as_str(), item.order))
        .collect();
    assert!(orders.contains(&("a", 0)));
    assert!(orders.contains(&("f0", 1)));
    assert!(orders.contains(&("f1", 2)));
    assert_eq!(shelf.item("a").and_then(|a| a.basis), Some(20.0));
    assert!(board.grid("left").unwrap().item("a").is_none());
}
