use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::html::{Canvas, Div};
use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::anchors;
use super::config::GraphConfig;
use super::deep_link::{self, DeepLink};
use super::error::Result;
use super::flatten::FlatEdge;
use super::geometry::Point;
use super::layout::Subscription;
use super::panel::{Action, ContextMenu, DetailPanel, Details, MenuBar, MenuTarget};
use super::selection::{Coordinator, Effect as GraphEffect};
use super::state::GraphState;
use super::theme::Theme;
use super::types::GraphData;
use super::viewport::ViewTransform;

const FALLBACK_WIDTH: f64 = 800.0;
const FALLBACK_HEIGHT: f64 = 600.0;
const FRAME_DT: f32 = 0.016;

type SharedState = Rc<RefCell<Option<GraphState>>>;

/// Reactive values the surrounding views read.
#[derive(Clone, Copy)]
struct Ui {
	details: RwSignal<Option<Details>>,
	has_selection: RwSignal<bool>,
	menu: RwSignal<Option<MenuTarget>>,
	menu_anchor: RwSignal<Option<Point>>,
	transform: RwSignal<ViewTransform>,
	cursor: RwSignal<&'static str>,
}

impl Ui {
	fn new() -> Self {
		Self {
			details: RwSignal::new(None),
			has_selection: RwSignal::new(false),
			menu: RwSignal::new(None),
			menu_anchor: RwSignal::new(None),
			transform: RwSignal::new(ViewTransform::default()),
			cursor: RwSignal::new("grab"),
		}
	}
}

/// Carries out graph transitions and their browser side effects.
#[derive(Clone)]
struct Host {
	state: SharedState,
	graph_id: String,
	container: NodeRef<Div>,
	on_edge_click: Option<Callback<FlatEdge>>,
	menu_sub: Rc<Cell<Option<Subscription>>>,
	ui: Ui,
}

impl Host {
	fn with_state<R>(&self, f: impl FnOnce(&mut GraphState) -> R) -> Option<R> {
		self.state.borrow_mut().as_mut().map(f)
	}

	fn transition(&self, f: impl FnOnce(&mut Coordinator) -> Result<Vec<GraphEffect>>) {
		let effects = self.with_state(|s| s.run(f)).unwrap_or_default();
		self.finish(effects);
	}

	fn finish(&self, effects: Vec<GraphEffect>) {
		self.refresh();
		self.perform(effects);
	}

	/// Push coordinator state into the panel signals.
	fn refresh(&self) {
		let snapshot = self.with_state(|s| {
			(
				Details::from_coordinator(&s.coordinator),
				s.coordinator.selection_link().is_some(),
			)
		});
		if let Some((details, has_selection)) = snapshot {
			self.ui.details.set(details);
			self.ui.has_selection.set(has_selection);
		}
	}

	fn perform(&self, effects: Vec<GraphEffect>) {
		for effect in effects {
			match effect {
				GraphEffect::WriteFragment(fragment) => {
					if let Some(window) = web_sys::window() {
						let _ = window.location().set_hash(&fragment);
					}
				}
				GraphEffect::EdgeClicked(edge) => {
					if let Some(cb) = self.on_edge_click {
						cb.run(edge);
					}
				}
				GraphEffect::ScrollIntoView => {
					if let Some(container) = self.container.get() {
						anchors::scroll_into_view(&container);
					}
				}
				other => debug!("article-graph: effect {other:?} already applied"),
			}
		}
	}

	fn act(&self, action: Action) {
		match action {
			Action::ExpandAll => self.transition(|c| Ok(c.expand_all())),
			Action::CollapseAll => {
				self.close_menu();
				self.transition(|c| Ok(c.collapse_all()));
			}
			Action::ZoomToFit => {
				self.with_state(GraphState::zoom_to_fit);
			}
			Action::CopySelectionLink => {
				if let Some(link) = self.with_state(|s| s.coordinator.selection_link()).flatten() {
					self.copy_link(link);
				}
			}
			Action::CopyNodeLink(id) => {
				self.close_menu();
				self.copy_link(DeepLink::Node(id));
			}
			Action::ToggleNode(id) => {
				self.close_menu();
				self.transition(|c| c.toggle_expansion(&id));
			}
			Action::ShowSection(id) => {
				let flash = self
					.with_state(|s| s.theme.section_flash)
					.unwrap_or(Theme::light().section_flash);
				if let Err(e) = anchors::scroll_to_section(&id, flash) {
					warn!("article-graph: {e}");
				}
			}
			Action::CloseMenu => self.close_menu(),
		}
	}

	fn copy_link(&self, link: DeepLink) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let page = window.location().href().unwrap_or_default();
		let url = deep_link::anchor_url(&page, &self.graph_id, &link);
		wasm_bindgen_futures::spawn_local(async move {
			if anchors::copy_text(&url).await.is_ok() {
				info!("article-graph: copied {url}");
			}
		});
	}

	/// Open the context menu on `id`, following the node as the layout moves
	/// it.
	fn open_menu(&self, id: &str) {
		self.close_menu();
		let anchor = self.ui.menu_anchor;
		let opened = self.with_state(|s| {
			let target = s.coordinator.flat().node(id).map(MenuTarget::of)?;
			let followed = id.to_owned();
			let sub = s.layout.subscribe(move |positions| {
				let p = positions.get(&followed).copied();
				if anchor.get_untracked() != p {
					anchor.set(p);
				}
			});
			Some((target, s.layout.position(id), sub))
		});
		if let Some(Some((target, position, sub))) = opened {
			self.menu_sub.set(Some(sub));
			anchor.set(position);
			self.ui.menu.set(Some(target));
		}
	}

	fn close_menu(&self) {
		if let Some(sub) = self.menu_sub.take() {
			self.with_state(|s| s.layout.unsubscribe(sub));
		}
		if self.ui.menu.get_untracked().is_some() {
			self.ui.menu.set(None);
		}
		self.ui.menu_anchor.set(None);
	}

	fn update_cursor(&self) {
		let cursor = self
			.with_state(|s| {
				if s.drag.active || (s.pan.active && s.moved) {
					"grabbing"
				} else if s.hover.is_some() {
					"pointer"
				} else {
					"grab"
				}
			})
			.unwrap_or("grab");
		if self.ui.cursor.get_untracked() != cursor {
			self.ui.cursor.set(cursor);
		}
	}
}

fn local_point(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top()))
}

fn measure(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	let w = width.unwrap_or_else(|| {
		parent
			.as_ref()
			.map(|p| p.client_width() as f64)
			.filter(|w| *w > 0.0)
			.unwrap_or(FALLBACK_WIDTH)
	});
	let h = height.unwrap_or_else(|| {
		parent
			.as_ref()
			.map(|p| p.client_height() as f64)
			.filter(|h| *h > 0.0)
			.unwrap_or(FALLBACK_HEIGHT)
	});
	(w, h)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn current_hash() -> String {
	web_sys::window()
		.and_then(|w| w.location().hash().ok())
		.unwrap_or_default()
}

/// Zoomable hierarchical graph drawn on a canvas and linked to the URL
/// fragment and the surrounding article.
#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	/// Prefix of every deep-link fragment; must be unique on the page.
	#[prop(into)]
	graph_id: String,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] initial_expanded: Vec<String>,
	#[prop(optional, into)] highlight_node_id: MaybeProp<String>,
	#[prop(optional, into)] highlight_edge_id: MaybeProp<String>,
	#[prop(default = None)] on_edge_click: Option<Callback<FlatEdge>>,
	#[prop(optional)] config: GraphConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let container_ref = NodeRef::<Div>::new();
	let ui = Ui::new();
	let ready = RwSignal::new(false);
	let host = Host {
		state: Rc::new(RefCell::new(None)),
		graph_id: graph_id.clone(),
		container: container_ref,
		on_edge_click,
		menu_sub: Rc::new(Cell::new(None)),
		ui,
	};

	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let listeners: Rc<RefCell<Vec<Closure<dyn FnMut(Event)>>>> = Rc::new(RefCell::new(Vec::new()));
	let started = Rc::new(Cell::new(false));

	let host_init = host.clone();
	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = measure(&canvas, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let Some(ctx) = context_2d(&canvas) else {
			error!("article-graph: canvas 2d context unavailable");
			return;
		};

		host_init.close_menu();
		let state = GraphState::new(
			&host_init.graph_id,
			&data,
			initial_expanded.clone(),
			config.clone(),
			Theme::from_document(),
			w,
			h,
		);
		info!(
			"article-graph: {} ready with {} visible nodes",
			host_init.graph_id,
			state.coordinator.flat().nodes.len()
		);
		*host_init.state.borrow_mut() = Some(state);
		host_init.refresh();
		ready.set(true);

		let hash = current_hash();
		if !hash.is_empty() {
			host_init.transition(|c| c.resolve_fragment(&hash));
		}

		if started.replace(true) {
			return;
		}

		let (host_anim, animate_inner) = (host_init.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let transform = host_anim.with_state(|s| {
				s.frame(&ctx, FRAME_DT, now);
				s.viewport.transform
			});
			if let Some(t) = transform {
				if host_anim.ui.transform.get_untracked() != t {
					host_anim.ui.transform.set(t);
				}
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(cb) = animate.borrow().as_ref() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}

		let host_hash = host_init.clone();
		let on_hash: Closure<dyn FnMut(Event)> = Closure::new(move |_: Event| {
			let hash = current_hash();
			host_hash.transition(|c| c.resolve_fragment(&hash));
		});
		let _ = window
			.add_event_listener_with_callback("hashchange", on_hash.as_ref().unchecked_ref());

		let (host_resize, canvas_resize) = (host_init.clone(), canvas.clone());
		let on_resize: Closure<dyn FnMut(Event)> = Closure::new(move |_: Event| {
			let (nw, nh) = measure(&canvas_resize, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			host_resize.with_state(|s| s.resize(nw, nh));
		});
		let _ =
			window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());

		let host_anchor = host_init.clone();
		let on_anchor: Closure<dyn FnMut(Event)> = Closure::new(move |ev: Event| {
			let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
				return;
			};
			if let Some(link) = anchors::anchor_link(&target, &host_anchor.graph_id) {
				ev.prevent_default();
				host_anchor.transition(|c| c.open(&link));
			}
		});
		if let Some(document) = window.document() {
			let _ = document.add_event_listener_with_callback_and_bool(
				"click",
				on_anchor.as_ref().unchecked_ref(),
				true,
			);
		}

		listeners.borrow_mut().extend([on_hash, on_resize, on_anchor]);
	});

	let host_hl = host.clone();
	Effect::new(move |_| {
		if !ready.get() {
			return;
		}
		if let Some(id) = highlight_node_id.get() {
			host_hl.transition(|c| c.highlight_node(&id));
		}
	});

	let host_hl_edge = host.clone();
	Effect::new(move |_| {
		if !ready.get() {
			return;
		}
		if let Some(id) = highlight_edge_id.get() {
			host_hl_edge.transition(|c| c.highlight_edge(&id));
		}
	});

	let pending = RwSignal::new(None::<Action>);
	let on_action = Callback::new(move |action: Action| pending.set(Some(action)));
	let host_act = host.clone();
	Effect::new(move |_| {
		if let Some(action) = pending.get() {
			pending.update_untracked(|p| *p = None);
			host_act.act(action);
		}
	});

	let host_md = host.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		host_md.with_state(|s| s.press(x, y));
		host_md.update_cursor();
	};

	let host_mm = host.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		host_mm.with_state(|s| s.pointer_move(x, y));
		host_mm.update_cursor();
	};

	let host_mu = host.clone();
	let on_mouseup = move |_: MouseEvent| {
		host_mu.with_state(GraphState::release);
		host_mu.update_cursor();
	};

	let host_ml = host.clone();
	let on_mouseleave = move |_: MouseEvent| {
		host_ml.with_state(GraphState::leave);
		host_ml.update_cursor();
	};

	let host_click = host.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		host_click.close_menu();
		let effects = match host_click.with_state(|s| s.click(x, y)) {
			Some(Ok(effects)) => effects,
			Some(Err(e)) => {
				warn!("article-graph: {e}");
				Vec::new()
			}
			None => Vec::new(),
		};
		host_click.finish(effects);
	};

	let host_menu = host.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		match host_menu.with_state(|s| s.node_at(x, y)).flatten() {
			Some(id) => host_menu.open_menu(&id),
			None => host_menu.close_menu(),
		}
	};

	let host_wh = host.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let now = js_sys::Date::now();
		host_wh.with_state(|s| s.wheel(x, y, ev.delta_y(), now));
	};

	let menu_position = Signal::derive(move || {
		let p = ui.menu_anchor.get()?;
		Some(ui.transform.get().graph_to_screen(p))
	});

	view! {
		<div
			node_ref=container_ref
			class="article-graph"
			id=format!("{graph_id}-container")
			style="position: relative;"
		>
			<MenuBar has_selection=ui.has_selection on_action=on_action />
			<canvas
				node_ref=canvas_ref
				class="article-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:contextmenu=on_contextmenu
				on:wheel=on_wheel
				style=move || format!("display: block; cursor: {};", ui.cursor.get())
			/>
			<ContextMenu target=ui.menu position=menu_position on_action=on_action />
			<DetailPanel details=ui.details on_action=on_action />
		</div>
	}
}
