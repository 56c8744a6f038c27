use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::placement::{
    CollisionLayer, Footprint, Measure, NestedBox, PlacementError, PlacementOptions,
};
use crate::rtree::Rectangle;

/// 场景文件：静态元素和候选元素
///
/// ```json
/// {
///   "statics": [{"id": "home", "anchor": [0, 0], "footprint": [[-4, -4, 4, 4]]}],
///   "candidates": [
///     {"id": "cafe", "anchor": [3, 1], "priority": 5, "footprint": [[-8, -8, 8, 8]]}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub statics: Vec<SceneElement>,
    #[serde(default)]
    pub candidates: Vec<SceneElement>,
}

/// 场景中的一个元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    pub id: String,
    /// 世界坐标中的锚点，视口坐标 = 世界坐标 × 2^zoom
    pub anchor: [f64; 2],
    #[serde(default)]
    pub priority: i32,
    pub footprint: FootprintSpec,
}

/// 足迹描述：局部坐标系中的 `[minX, minY, maxX, maxY]` 列表，或嵌套的相对矩形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FootprintSpec {
    Boxes(Vec<[f64; 4]>),
    Nested(NestedBox),
}

impl FootprintSpec {
    /// 转换为足迹；坐标非有限或 min > max 时报告测量错误
    pub fn to_footprint(&self, id: &str) -> Result<Footprint, PlacementError> {
        match self {
            FootprintSpec::Boxes(boxes) => {
                let rects = boxes
                    .iter()
                    .map(|&[x_min, y_min, x_max, y_max]| {
                        let valid = [x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite())
                            && x_min <= x_max
                            && y_min <= y_max;
                        if valid {
                            Ok(Rectangle::new(x_min, y_min, x_max, y_max))
                        } else {
                            Err(PlacementError::measurement(
                                &id,
                                format!("malformed box [{x_min}, {y_min}, {x_max}, {y_max}]"),
                            ))
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Footprint::new(rects))
            }
            FootprintSpec::Nested(root) => {
                let footprint = Footprint::nested(root);
                if footprint.boxes().iter().any(|rect| rect.is_empty()) {
                    return Err(PlacementError::measurement(&id, "malformed nested box"));
                }
                Ok(footprint)
            }
        }
    }
}

impl Scene {
    /// 从 JSON 文件读取场景
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scene '{}': {}", path.display(), e))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        let scene: Scene =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse scene: {}", e))?;
        scene.validate()?;
        Ok(scene)
    }

    /// 元素 id 必须唯一
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for element in self.statics.iter().chain(&self.candidates) {
            if !seen.insert(element.id.as_str()) {
                return Err(format!("Duplicate element id: '{}'", element.id));
            }
        }
        Ok(())
    }

    /// 构建图层：加入所有静态元素和候选元素
    ///
    /// 返回加入时测量失败的元素；它们仍然留在图层中，视口变化时会再次报告
    pub fn build_layer(
        &self,
        options: PlacementOptions,
    ) -> (CollisionLayer<String, SceneMeasure>, Vec<(String, PlacementError)>) {
        let mut layer = CollisionLayer::new(SceneMeasure::new(self), options);
        let mut failures = Vec::new();

        for element in &self.statics {
            if let Err(err) = layer.add_static(element.id.clone()) {
                failures.push((element.id.clone(), err));
            }
        }
        for element in &self.candidates {
            if let Err(err) = layer.add_candidate(element.id.clone(), element.priority) {
                failures.push((element.id.clone(), err));
            }
        }

        (layer, failures)
    }
}

/// 基于场景文件的测量协作者
///
/// 足迹直接取自场景描述，锚点按当前缩放级别投影
#[derive(Debug, Clone)]
pub struct SceneMeasure {
    elements: HashMap<String, SceneElement>,
    zoom: i32,
}

impl SceneMeasure {
    pub fn new(scene: &Scene) -> Self {
        let elements = scene
            .statics
            .iter()
            .chain(&scene.candidates)
            .map(|element| (element.id.clone(), element.clone()))
            .collect();
        SceneMeasure { elements, zoom: 0 }
    }

    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    /// 切换缩放级别，之后应触发一次视口变化
    pub fn set_zoom(&mut self, zoom: i32) {
        self.zoom = zoom;
    }

    pub fn scale(&self) -> f64 {
        2f64.powi(self.zoom)
    }
}

impl Measure<String> for SceneMeasure {
    fn footprint(&self, element: &String) -> Result<Footprint, PlacementError> {
        let entry = self
            .elements
            .get(element)
            .ok_or_else(|| PlacementError::measurement(element, "unknown element"))?;
        entry.footprint.to_footprint(element)
    }

    fn anchor(&self, element: &String) -> Result<[f64; 2], PlacementError> {
        let entry = self
            .elements
            .get(element)
            .ok_or_else(|| PlacementError::missing_anchor(element))?;
        let scale = self.scale();
        Ok([entry.anchor[0] * scale, entry.anchor[1] * scale])
    }
}
