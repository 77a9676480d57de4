/// Projection mode the host is rendering in this frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum SceneMode {
    #[default]
    Scene3D,
    Scene2D,
    /// 2.5D: flat map with height.
    ColumbusView,
}

impl SceneMode {
    /// In any mode other than 3D, positions are re-projected before upload.
    #[inline]
    pub fn is_3d(self) -> bool {
        matches!(self, SceneMode::Scene3D)
    }
}
