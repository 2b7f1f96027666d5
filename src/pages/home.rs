use leptos::prelude::*;
use log::info;

use crate::components::graph::{FlatEdge, GraphCanvas, GraphData};
use crate::load_graph_data;

const GRAPH_ID: &str = "ai-frameworks";

/// Used when the page carries no `#graph-data` script.
const SAMPLE: &str = r##"{
	"nodes": [
		{
			"id": "category-frameworks",
			"label": "Frameworks",
			"description": "General purpose toolkits for building LLM applications",
			"color": "#68BDF6",
			"markdownSection": "frameworks",
			"children": [
				{
					"id": "LangChain",
					"description": "Composable chains, tools and retrieval",
					"color": "#60BE86",
					"markdownSection": "langchain",
					"keyLinks": ["https://python.langchain.com"]
				},
				{
					"id": "LlamaIndex",
					"description": "Data connectors and indexes for retrieval",
					"color": "#60BE86",
					"markdownSection": "llamaindex",
					"keyLinks": ["https://www.llamaindex.ai"]
				},
				{
					"id": "Semantic Kernel",
					"description": "Planner and plugin model for enterprise apps",
					"color": "#60BE86",
					"markdownSection": "semantic-kernel"
				}
			]
		},
		{
			"id": "category-multi-agent",
			"label": "Multi-agent frameworks",
			"description": "Coordinate several cooperating agents",
			"color": "#68BDF6",
			"markdownSection": "multi-agent-frameworks",
			"children": [
				{
					"id": "AutoGen",
					"description": "Conversational agents that message each other",
					"color": "#60BE86",
					"markdownSection": "autogen"
				},
				{
					"id": "CrewAI",
					"description": "Role based crews with delegated tasks",
					"color": "#60BE86",
					"markdownSection": "crewai"
				},
				{
					"id": "LangGraph",
					"description": "Stateful agent graphs built on LangChain",
					"color": "#60BE86",
					"markdownSection": "langgraph"
				}
			]
		}
	],
	"links": [
		{
			"source": "LangGraph", "target": "LangChain", "id": "langgraph-builds-on",
			"label": "builds on", "value": 3, "markdownSection": "langgraph"
		},
		{
			"source": "CrewAI", "target": "LangChain", "id": "crewai-integrates",
			"label": "integrates", "value": 1
		},
		{
			"source": "LlamaIndex", "target": "LangChain", "id": "llamaindex-plugs-into",
			"label": "plugs into", "value": 1
		},
		{
			"source": "LangChain", "target": "LlamaIndex", "type": "comparison",
			"label": "compared with", "markdownSection": "langchain-vs-llamaindex",
			"similarities": ["retrieval", "tool calling"],
			"differences": { "source": ["agent executors"], "target": ["index structures"] }
		},
		{
			"source": "AutoGen", "target": "CrewAI", "type": "comparison",
			"label": "compared with", "markdownSection": "autogen-vs-crewai",
			"similarities": ["multi-agent chat"],
			"differences": { "source": ["code execution sandbox"], "target": ["role definitions"] }
		}
	]
}"##;

fn graph_data() -> GraphData {
	load_graph_data("graph-data")
		.or_else(|_| GraphData::from_json(SAMPLE))
		.unwrap_or_default()
}

/// An inline link that drives the graph when clicked.
#[component]
fn NodeMention(node: &'static str, children: Children) -> impl IntoView {
	view! {
		<a href="#" data-graph-node=node data-graph-id=GRAPH_ID>
			{children()}
		</a>
	}
}

#[component]
fn EdgeMention(edge: &'static str, children: Children) -> impl IntoView {
	view! {
		<a href="#" data-graph-edge=edge data-graph-id=GRAPH_ID>
			{children()}
		</a>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let data = graph_data();
	let graph_data = Signal::derive(move || data.clone());
	let initial_expanded =
		vec!["category-frameworks".to_owned(), "category-multi-agent".to_owned()];
	let on_edge_click =
		Callback::new(|edge: FlatEdge| info!("article-graph: edge {} clicked", edge.id));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<article class="graph-article">
				<h1>"Agent frameworks, mapped"</h1>
				<p class="subtitle">
					"Click a node to select it. Right click for more. "
					"Scroll to zoom and drag the background to pan."
				</p>

				<div class="graph-frame">
					<GraphCanvas
						data=graph_data
						graph_id=GRAPH_ID
						initial_expanded=initial_expanded
						on_edge_click=Some(on_edge_click)
					/>
				</div>

				<h2 id="frameworks">"Frameworks"</h2>
				<p>
					"General purpose toolkits such as "
					<NodeMention node="LangChain">"LangChain"</NodeMention>
					" and "
					<NodeMention node="LlamaIndex">"LlamaIndex"</NodeMention>
					" cover prompting, tools and retrieval."
				</p>

				<h3 id="langchain">"LangChain"</h3>
				<p>"Chains, agents and a large integration catalogue."</p>

				<h3 id="llamaindex">"LlamaIndex"</h3>
				<p>"Connectors and index structures aimed at retrieval augmented generation."</p>

				<h3 id="semantic-kernel">"Semantic Kernel"</h3>
				<p>"Plugins and planners with first class .NET support."</p>

				<h3 id="langchain-vs-llamaindex">"LangChain vs LlamaIndex"</h3>
				<p>
					"See the "
					<EdgeMention edge="compare-LangChain-LlamaIndex-forward">
						"comparison edge"
					</EdgeMention>
					" for what they share."
				</p>

				<h2 id="multi-agent-frameworks">"Multi-agent frameworks"</h2>
				<p>
					<NodeMention node="AutoGen">"AutoGen"</NodeMention>
					", "
					<NodeMention node="CrewAI">"CrewAI"</NodeMention>
					" and "
					<NodeMention node="LangGraph">"LangGraph"</NodeMention>
					" coordinate several agents."
				</p>

				<h3 id="autogen">"AutoGen"</h3>
				<p>"Agents converse by message passing and can run generated code."</p>

				<h3 id="crewai">"CrewAI"</h3>
				<p>"Crews of role playing agents hand tasks to each other."</p>

				<h3 id="langgraph">"LangGraph"</h3>
				<p>
					"Builds on LangChain ("
					<EdgeMention edge="langgraph-builds-on">"see edge"</EdgeMention>
					") with explicit state machines."
				</p>

				<h3 id="autogen-vs-crewai">"AutoGen vs CrewAI"</h3>
				"Both run multi-agent conversations. "
				"AutoGen focuses on code execution, CrewAI on roles."
			</article>
		</ErrorBoundary>
	}
}
