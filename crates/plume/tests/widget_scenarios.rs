//! End-to-end widget scenarios driven through the public `Gui` API.

use std::cell::RefCell;
use std::rc::Rc;

use plume::core::flags::element;
use plume::core::message::{buttons, subtype};
use plume::core::{
    AbsRect, AbsVec, Backend, CRect, DrawAttributes, FontDesc, InsertAt, Message, MessageKind, NodeId,
    ResolvedTransform, ResourceHandle, Transform,
};
use plume::{Gui, GuiConfig, Origin};

/// What a [`Recorder`] saw, in call order.
#[derive(Debug, Clone, PartialEq)]
enum Op {
    Draw(AbsRect, u32),
    Text(String, AbsRect),
    PushClip(AbsRect),
    PopClip,
}

#[derive(Debug, Default)]
struct Recorder {
    ops: Vec<Op>,
}

impl Backend for Recorder {
    fn draw(&mut self, rect: &AbsRect, _transform: &ResolvedTransform, attributes: &DrawAttributes) {
        self.ops.push(Op::Draw(*rect, attributes.color));
    }

    fn draw_text(
        &mut self,
        text: &str,
        _font: Option<&FontDesc>,
        _color: u32,
        rect: &AbsRect,
        _transform: &ResolvedTransform,
    ) {
        self.ops.push(Op::Text(text.to_string(), *rect));
    }

    fn measure_text(&mut self, text: &str, _font: Option<&FontDesc>) -> AbsVec {
        AbsVec::new(text.len() as f32 * 8.0, 16.0)
    }

    fn load_resource(&mut self, _bytes: &[u8]) -> ResourceHandle {
        ResourceHandle(0)
    }

    fn release_resource(&mut self, _handle: ResourceHandle) {}

    fn push_clip(&mut self, rect: &AbsRect) {
        self.ops.push(Op::PushClip(*rect));
    }

    fn pop_clip(&mut self) {
        self.ops.push(Op::PopClip);
    }
}

/// Routes `RUST_LOG`-filtered output through the test harness.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn gui() -> Gui<Recorder> {
    init_logging();
    Gui::new(Recorder::default(), GuiConfig::default())
}

fn area(l: f32, t: f32, r: f32, b: f32) -> Transform {
    Transform::with_area(CRect::from_abs(l, t, r, b))
}

fn is_hidden(gui: &mut Gui<Recorder>, parent: NodeId, name: &str) -> bool {
    let child = gui.child(parent, name).unwrap();
    gui.flags(child).unwrap() & element::HIDDEN != 0
}

#[test]
fn test_checkbox_scenario() {
    let mut gui = gui();
    let cb = gui.create(None, "Checkbox", "cb", area(0.0, 0.0, 20.0, 20.0)).unwrap();
    assert_eq!(gui.state(cb), Some(0));

    gui.send(cb, MessageKind::Action);
    assert_eq!(gui.state(cb), Some(1));
    assert!(!is_hidden(&mut gui, cb, "check"));

    gui.send(cb, MessageKind::Action);
    assert_eq!(gui.state(cb), Some(0));
    assert!(is_hidden(&mut gui, cb, "check"));

    gui.dispatch(cb, &Message::int(MessageKind::SetState, 2));
    assert_eq!(gui.state(cb), Some(2));
    assert!(!is_hidden(&mut gui, cb, "indeterminate"));
    assert!(is_hidden(&mut gui, cb, "check"));
}

#[test]
fn test_button_click_through_input() {
    let mut gui = gui();
    let ok = gui.create(None, "Button", "ok", area(10.0, 10.0, 90.0, 40.0)).unwrap();
    let clicks = Rc::new(RefCell::new(Vec::new()));
    let seen = clicks.clone();
    gui.add_listener(ok, MessageKind::Action, move |id, _| seen.borrow_mut().push(id));

    let hover = gui.style_names().get("hover").unwrap();
    let active = gui.style_names().get("active").unwrap();
    gui.inject(&Message::mouse(MessageKind::MouseMove, 20.0, 20.0, 0, 0));
    assert_eq!(gui.style(ok), hover);
    gui.inject(&Message::mouse(MessageKind::MouseDown, 20.0, 20.0, buttons::LEFT, buttons::LEFT));
    assert_eq!(gui.style(ok), active);
    // Leaving while pressed cancels the press; moving outside under capture does not hover.
    gui.inject(&Message::mouse(MessageKind::MouseMove, 200.0, 200.0, 0, buttons::LEFT));
    assert_eq!(gui.style(ok), gui.style_names().get("neutral").unwrap());
    gui.inject(&Message::mouse(MessageKind::MouseMove, 20.0, 20.0, 0, buttons::LEFT));
    gui.inject(&Message::mouse(MessageKind::MouseDown, 20.0, 20.0, buttons::LEFT, buttons::LEFT));
    gui.inject(&Message::mouse(MessageKind::MouseUp, 20.0, 20.0, buttons::LEFT, 0));

    assert_eq!(*clicks.borrow(), vec![ok]);
    assert_eq!(gui.style(ok), hover);
}

#[test]
fn test_remove_and_reinsert_sibling() {
    let mut gui = gui();
    let p = gui.create(None, "Element", "p", Transform::FILL).unwrap();
    let a = gui.create(Some(InsertAt::Last(p)), "Element", "a", Transform::FILL).unwrap();
    let b = gui.create(Some(InsertAt::Last(p)), "Element", "b", Transform::FILL).unwrap();
    let c = gui.create(Some(InsertAt::Last(p)), "Element", "c", Transform::FILL).unwrap();

    gui.detach(b).unwrap();
    assert_eq!(gui.children(p), vec![a, c]);
    assert_eq!(gui.parent(b), None);
    assert!(gui.contains(b));

    gui.attach(b, InsertAt::After(a)).unwrap();
    assert_eq!(gui.children(p), vec![a, b, c]);
    assert_eq!(gui.parent(b), Some(p));

    assert!(gui.attach(p, InsertAt::Last(c)).is_err());
}

#[test]
fn test_draw_order_and_clipping() {
    let mut gui = gui();
    let root = gui.create(None, "Element", "root", area(0.0, 0.0, 100.0, 100.0)).unwrap();
    gui.dispatch(root, &Message::color(subtype::COLOR_MAIN, 0xFF000001));
    gui.dispatch(root, &Message::rect(MessageKind::SetPadding, AbsRect::new(10.0, 10.0, 10.0, 10.0)));

    let label = gui.create(Some(InsertAt::Last(root)), "Text", "label", area(0.0, 0.0, 50.0, 20.0)).unwrap();
    gui.set_text(label, "hi");
    let back = gui
        .create_with_flags(Some(InsertAt::Last(root)), "Element", "back", Transform::FILL, element::BACKGROUND)
        .unwrap();
    gui.dispatch(back, &Message::color(subtype::COLOR_MAIN, 0xFF000002));
    let hidden = gui
        .create_with_flags(Some(InsertAt::Last(root)), "Element", "gone", Transform::FILL, element::HIDDEN)
        .unwrap();
    gui.dispatch(hidden, &Message::color(subtype::COLOR_MAIN, 0xFF000003));

    gui.draw();
    let content = AbsRect::new(10.0, 10.0, 90.0, 90.0);
    assert_eq!(
        gui.backend().ops,
        vec![
            Op::Draw(AbsRect::new(0.0, 0.0, 100.0, 100.0), 0xFF000001),
            Op::PushClip(content),
            Op::Draw(content, 0xFF000002),
            Op::Text("hi".to_string(), AbsRect::new(10.0, 10.0, 60.0, 30.0)),
            Op::PopClip,
        ]
    );
}

const SKINS: &str = r#"<Skin name="button" color="FF202020">
  <Style name="neutral" color="FF202020"/>
  <Style name="hover" color="FF404040"/>
  <Element name="shine" flags="background|nohittest" area="0 0 100% 50%"/>
</Skin>"#;

#[test]
fn test_skin_application_and_change() {
    let mut gui = gui();
    gui.load_skin_str(SKINS).unwrap();
    gui.add_skin(plume::style::Skin::new("plain"));

    let ok = gui.create(None, "Button", "ok", area(0.0, 0.0, 80.0, 30.0)).unwrap();
    assert!(gui.set_skin(ok, "button").is_handled());
    let color = |gui: &mut Gui<Recorder>| gui.dispatch(ok, &Message::new(MessageKind::GetColor)).as_int();
    assert_eq!(color(&mut gui), Some(0xFF202020));

    let shine = gui.child(ok, "shine").unwrap();
    assert_eq!(gui.widget(shine).unwrap().element.origin, Origin::Skin);
    assert_eq!(gui.resolve(shine).unwrap().rect, AbsRect::new(0.0, 0.0, 80.0, 15.0));

    gui.send(ok, MessageKind::Hover);
    assert_eq!(color(&mut gui), Some(0xFF404040));
    assert_eq!(gui.style(shine), gui.style(ok));
    gui.send(ok, MessageKind::Neutral);
    assert_eq!(color(&mut gui), Some(0xFF202020));

    assert!(gui.set_skin(ok, "plain").is_handled());
    assert_eq!(gui.child(ok, "shine"), None);
    assert!(gui.child(ok, "text").is_some());
    assert!(!gui.set_skin(ok, "missing").is_handled());
}

#[test]
fn test_skin_change_after_skin_element_removed() {
    let mut gui = gui();
    gui.load_skin_str(SKINS).unwrap();
    gui.add_skin(plume::style::Skin::new("plain"));
    let ok = gui.create(None, "Button", "ok", area(0.0, 0.0, 80.0, 30.0)).unwrap();
    gui.set_skin(ok, "button");

    let shine = gui.child(ok, "shine").unwrap();
    gui.destroy(shine).unwrap();
    assert!(gui.destroy(shine).is_err());

    assert!(gui.set_skin(ok, "plain").is_handled());
    assert!(gui.set_skin(ok, "button").is_handled());
    let skinned: Vec<_> = gui
        .children(ok)
        .into_iter()
        .filter(|&c| gui.widget(c).unwrap().element.origin == Origin::Skin)
        .collect();
    assert_eq!(skinned.len(), 1);
    assert!(gui.child(ok, "text").is_some());
}

#[test]
fn test_colored_button_survives_save_and_restore() {
    let mut gui = gui();
    let b = gui.create(None, "Button", "b", area(0.0, 0.0, 100.0, 20.0)).unwrap();
    gui.dispatch(b, &Message::color(subtype::COLOR_MAIN, 0xFF112233));
    gui.dispatch(b, &Message::color(subtype::COLOR_EDGE, 0xFF445566));

    let text = gui.save_layout(b, "saved").unwrap();
    assert!(text.contains(r#"color="FF112233""#), "{text}");
    assert!(text.contains(r#"edgecolor="FF445566""#), "{text}");

    let captured = gui.capture_layout(b).unwrap();
    gui.destroy(b).unwrap();
    let restored = gui.restore_layout(None, &captured).unwrap();

    let label = gui.child(restored, "text").unwrap();
    let get = |slot| Message::new(MessageKind::GetColor).with_subtype(slot);
    assert_eq!(gui.dispatch(label, &get(subtype::COLOR_MAIN)).as_int(), Some(0xFF112233));
    assert_eq!(gui.dispatch(label, &get(subtype::COLOR_EDGE)).as_int(), Some(0xFF445566));
    assert_eq!(gui.widget(restored).unwrap().element.color, 0);
    assert_eq!(gui.widget(restored).unwrap().element.edge_color, 0);
}

#[test]
fn test_default_skin_from_config() {
    init_logging();
    let config = GuiConfig::from_toml_str("default_skin = \"button\"").unwrap();
    let mut gui = Gui::new(Recorder::default(), config);
    gui.load_skin_str(SKINS).unwrap();
    let ok = gui.create(None, "Button", "ok", Transform::FILL).unwrap();
    assert!(gui.child(ok, "shine").is_some());
}

#[test]
fn test_capture_and_restore_layout() {
    let mut gui = gui();
    let window = gui.create(None, "Window", "main", area(0.0, 0.0, 300.0, 200.0)).unwrap();
    gui.set_text(window, "Settings");
    let ok = gui.create(Some(InsertAt::Last(window)), "Button", "ok", area(10.0, 40.0, 90.0, 70.0)).unwrap();
    gui.set_text(ok, "OK");
    let agree = gui.create(Some(InsertAt::Last(window)), "Checkbox", "agree", area(10.0, 80.0, 30.0, 100.0)).unwrap();
    gui.send(agree, MessageKind::Action);

    let captured = gui.capture_layout(window).unwrap();
    assert_eq!(captured.tree.children.len(), 2);

    let text = gui.save_layout(window, "saved").unwrap();
    gui.load_skin_str(&text).unwrap();
    assert_eq!(gui.skins().get("saved").unwrap().tree.children[0].type_name, "Window");

    gui.destroy(window).unwrap();
    assert!(gui.roots().is_empty());

    let restored = gui.restore_layout(None, &captured).unwrap();
    assert_eq!(gui.text(restored).as_deref(), Some("Settings"));
    let ok = gui.find(restored, "ok").unwrap();
    assert_eq!(gui.text(ok).as_deref(), Some("OK"));
    let agree = gui.find(restored, "agree").unwrap();
    assert_eq!(gui.state(agree), Some(1));
    assert_eq!(gui.resolve(agree).unwrap().rect, AbsRect::new(10.0, 80.0, 30.0, 100.0));
}

#[test]
fn test_keys_go_to_focus_and_bubble() {
    let mut gui = gui();
    let form = gui.create(None, "Container", "form", Transform::FILL).unwrap();
    let name = gui.create(Some(InsertAt::Last(form)), "Textbox", "name", area(0.0, 0.0, 100.0, 20.0)).unwrap();
    let escapes = Rc::new(RefCell::new(0));
    let count = escapes.clone();
    gui.add_listener(name, MessageKind::KeyDown, move |_, _| *count.borrow_mut() += 1);

    gui.set_focus(Some(name));
    for ch in "Ada".chars() {
        gui.inject(&Message::character(ch));
    }
    gui.inject(&Message::key(MessageKind::KeyDown, plume::core::message::keys::LEFT, 0));
    assert_eq!(gui.text(name).as_deref(), Some("Ada"));
    assert_eq!(gui.value(name), Some(2));
    assert_eq!(*escapes.borrow(), 1);

    // Unhandled keys are not an error.
    assert!(!gui.inject(&Message::key(MessageKind::KeyDown, plume::core::message::keys::ESCAPE, 0)).is_handled());
}
