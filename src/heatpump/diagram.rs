//! 검증을 통과한 구성을 외부 렌더러용 노드/엣지 그래프로 변환한다.
//! 배치는 목록 인덱스 기반의 고정 오프셋이므로 같은 구성은 항상 같은 그래프가 된다.

use serde::Serialize;

use super::catalog::{Catalog, CircuitType, ComponentPosition, Specs, POOL_ZONE_ID};
use super::system::SystemConfiguration;

pub const PAC_NODE_ID: &str = "pac";
pub const DHW_NODE_ID: &str = "dhw";

const ROW_HEIGHT: f64 = 120.0;
const ZONE_ROW_HEIGHT: f64 = 180.0;
const INPUT_X: f64 = -300.0;
const OUTPUT_X: f64 = 300.0;
const CIRCUIT_X: f64 = 600.0;
const ZONE_X: f64 = 1000.0;
const POOL_PART_X: f64 = 1250.0;
const POOL_PART_STEP: f64 = 220.0;
const DHW_X: f64 = 600.0;
const DHW_Y: f64 = -250.0;
const DHW_PART_Y: f64 = -420.0;
const DHW_PART_STEP: f64 = 160.0;

/// 수영장 존 하류에 순서대로 연결되는 고정 보조 부품 (id 접미사, 표시 이름).
const POOL_PARTS: [(&str, &str); 3] = [
    ("filter", "Filtre"),
    ("pump", "Pompe de filtration"),
    ("exchanger", "Échangeur piscine"),
];

/// 급탕 노드에 연결되는 고정 부품.
const DHW_PARTS: [(&str, &str); 3] = [
    ("dhw_tank", "Ballon ECS"),
    ("dhw_circulator", "Circulateur ECS"),
    ("dhw_valve", "Vanne 3 voies ECS"),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    HeatPump,
    Component,
    Zone,
    PoolPart,
    Dhw,
    DhwPart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub label: String,
    /// 카탈로그 id(모델, 부품, 존 타입). 고정 보조 부품은 없음.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Specs::is_empty")]
    pub specs: Specs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    pub data: NodeData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Supply,
    Pool,
    Dhw,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagram {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    fn add_node(
        &mut self,
        id: String,
        kind: NodeKind,
        (x, y): (f64, f64),
        label: String,
        reference: Option<String>,
        specs: Specs,
    ) {
        self.nodes.push(Node {
            id,
            kind,
            position: Position { x, y },
            data: NodeData {
                label,
                reference,
                specs,
            },
        });
    }

    fn connect(&mut self, source: &str, target: &str, kind: EdgeKind) {
        self.edges.push(Edge {
            id: format!("e_{source}_{target}"),
            source: source.to_string(),
            target: target.to_string(),
            kind,
        });
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn component_node_id(component_id: &str) -> String {
    format!("component_{component_id}")
}

pub fn zone_node_id(index: usize) -> String {
    format!("zone_{index}")
}

/// 구성을 그래프로 투영한다. 검증은 하지 않으므로 호출 측에서 먼저 `validate`를 거칠 것.
pub fn project(catalog: &Catalog, config: &SystemConfiguration) -> Diagram {
    let mut diagram = Diagram::default();

    let pac_label = catalog
        .model(&config.pac_type)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| config.pac_type.clone());
    diagram.add_node(
        PAC_NODE_ID.into(),
        NodeKind::HeatPump,
        (0.0, 0.0),
        pac_label,
        Some(config.pac_type.clone()),
        Specs::new(),
    );

    let (mut inputs, mut outputs, mut circuits) = (0usize, 0usize, 0usize);
    for component in &config.components.mandatory {
        let counter = match component.position {
            ComponentPosition::Input => &mut inputs,
            ComponentPosition::Output => &mut outputs,
            ComponentPosition::Circuit => &mut circuits,
        };
        let x = match component.position {
            ComponentPosition::Input => INPUT_X,
            ComponentPosition::Output => OUTPUT_X,
            ComponentPosition::Circuit => CIRCUIT_X,
        };
        let y = *counter as f64 * ROW_HEIGHT;
        *counter += 1;
        diagram.add_node(
            component_node_id(&component.id),
            NodeKind::Component,
            (x, y),
            component.name.clone(),
            Some(component.id.clone()),
            component.specs.clone(),
        );
    }

    let buffer_id = &catalog.sizing().buffer_tank_id;
    let upstream = if config.circuit_type != CircuitType::Pool
        && config.components.has_mandatory(buffer_id)
    {
        let buffer_node = component_node_id(buffer_id);
        diagram.connect(PAC_NODE_ID, &buffer_node, EdgeKind::Supply);
        buffer_node
    } else {
        PAC_NODE_ID.to_string()
    };

    for (index, zone) in config.zones.iter().enumerate() {
        let zone_id = zone_node_id(index);
        let y = index as f64 * ZONE_ROW_HEIGHT;
        let label = catalog
            .zone_type(&zone.zone_type)
            .map(|z| z.name.clone())
            .unwrap_or_else(|| zone.zone_type.clone());
        diagram.add_node(
            zone_id.clone(),
            NodeKind::Zone,
            (ZONE_X, y),
            label,
            Some(zone.zone_type.clone()),
            Specs::new(),
        );
        diagram.connect(&upstream, &zone_id, EdgeKind::Supply);

        if zone.zone_type == POOL_ZONE_ID {
            let mut previous = zone_id.clone();
            for (step, (suffix, label)) in POOL_PARTS.iter().enumerate() {
                let part_id = format!("{zone_id}_{suffix}");
                diagram.add_node(
                    part_id.clone(),
                    NodeKind::PoolPart,
                    (POOL_PART_X + step as f64 * POOL_PART_STEP, y),
                    label.to_string(),
                    None,
                    Specs::new(),
                );
                diagram.connect(&previous, &part_id, EdgeKind::Pool);
                previous = part_id;
            }
        }
    }

    if let Some(dhw) = &config.dhw {
        let specs: Specs = [
            ("tank_volume_l".to_string(), dhw.tank_volume_l),
            ("setpoint_c".to_string(), dhw.setpoint_c),
        ]
        .into_iter()
        .collect();
        diagram.add_node(
            DHW_NODE_ID.into(),
            NodeKind::Dhw,
            (DHW_X, DHW_Y),
            "Eau chaude sanitaire".into(),
            None,
            specs,
        );
        diagram.connect(&upstream, DHW_NODE_ID, EdgeKind::Dhw);
        for (step, (id, label)) in DHW_PARTS.iter().enumerate() {
            diagram.add_node(
                id.to_string(),
                NodeKind::DhwPart,
                (DHW_X + (step as f64 - 1.0) * DHW_PART_STEP, DHW_PART_Y),
                label.to_string(),
                None,
                Specs::new(),
            );
            diagram.connect(DHW_NODE_ID, id, EdgeKind::Dhw);
        }
    }

    diagram
}
