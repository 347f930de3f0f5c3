use super::{GlslType, Precision, TypeKind};

impl Precision {
    fn interpret(source: &str) -> Option<Precision> {
        match source {
            "lowp" => Some(Precision::Lowp),
            "mediump" => Some(Precision::Mediump),
            "highp" => Some(Precision::Highp),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Precision::Lowp => "lowp",
            Precision::Mediump => "mediump",
            Precision::Highp => "highp",
        }
    }
}

impl TypeKind {
    fn interpret(source: &str) -> Option<TypeKind> {
        match source {
            "void" => Some(TypeKind::Void),
            "bool" => Some(TypeKind::Bool),
            "int" => Some(TypeKind::Int),
            "uint" => Some(TypeKind::Uint),
            "float" => Some(TypeKind::Float),
            "vec2" => Some(TypeKind::Vec2),
            "vec3" => Some(TypeKind::Vec3),
            "vec4" => Some(TypeKind::Vec4),
            "bvec2" => Some(TypeKind::Bvec2),
            "bvec3" => Some(TypeKind::Bvec3),
            "bvec4" => Some(TypeKind::Bvec4),
            "ivec2" => Some(TypeKind::Ivec2),
            "ivec3" => Some(TypeKind::Ivec3),
            "ivec4" => Some(TypeKind::Ivec4),
            "uvec2" => Some(TypeKind::Uvec2),
            "uvec3" => Some(TypeKind::Uvec3),
            "uvec4" => Some(TypeKind::Uvec4),
            "mat2" => Some(TypeKind::Mat2),
            "mat3" => Some(TypeKind::Mat3),
            "mat4" => Some(TypeKind::Mat4),
            "sampler2D" => Some(TypeKind::Sampler2D),
            "sampler3D" => Some(TypeKind::Sampler3D),
            "samplerCube" => Some(TypeKind::SamplerCube),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Void => "void",
            TypeKind::Bool => "bool",
            TypeKind::Int => "int",
            TypeKind::Uint => "uint",
            TypeKind::Float => "float",
            TypeKind::Vec2 => "vec2",
            TypeKind::Vec3 => "vec3",
            TypeKind::Vec4 => "vec4",
            TypeKind::Bvec2 => "bvec2",
            TypeKind::Bvec3 => "bvec3",
            TypeKind::Bvec4 => "bvec4",
            TypeKind::Ivec2 => "ivec2",
            TypeKind::Ivec3 => "ivec3",
            TypeKind::Ivec4 => "ivec4",
            TypeKind::Uvec2 => "uvec2",
            TypeKind::Uvec3 => "uvec3",
            TypeKind::Uvec4 => "uvec4",
            TypeKind::Mat2 => "mat2",
            TypeKind::Mat3 => "mat3",
            TypeKind::Mat4 => "mat4",
            TypeKind::Sampler2D => "sampler2D",
            TypeKind::Sampler3D => "sampler3D",
            TypeKind::SamplerCube => "samplerCube",
        }
    }
}

impl GlslType {
    pub fn new(precision: Option<Precision>, kind: TypeKind) -> Self {
        Self { precision, kind }
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn format(&self) -> String {
        match self.precision {
            Some(precision) => format!("{} {}", precision.as_str(), self.kind.as_str()),
            None => self.kind.as_str().to_string(),
        }
    }
}

/// Try to interpret a one-lexeme canonical type.
pub fn interpret_type(source: &str) -> Option<GlslType> {
    TypeKind::interpret(source).map(|kind| GlslType::new(None, kind))
}

/// Try to interpret a precision keyword followed by a base type.
pub fn interpret_type_pair(first: &str, second: &str) -> Option<GlslType> {
    let precision = Precision::interpret(first)?;
    TypeKind::interpret(second).map(|kind| GlslType::new(Some(precision), kind))
}
