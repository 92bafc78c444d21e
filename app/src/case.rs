//! The TOML description of a matching problem.
//!
//! Expressions are externally tagged tables, e.g. `{ pointer = { local = "T" } }` for
//! `T*`. Inline tables must fit on one line, so larger cases spread their expressions
//! over arrays.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_derive::Deserialize;

use ir::{
    AtomicTypeLiteral, BinOp, BinaryOp, ClassMemberAccess, ConstantDef, Expr, ExprType, FunctionType, Literal,
    ModifiedType, StaticAssert, TemplateArgDecl, TemplateArgType, TemplateBodyElement, TemplateDefn,
    TemplateInstantiation, TemplateSpecialization, Typedef, UnOp, UnaryOp, VariadicTypeExpansion,
};

use crate::result::{CaseError, IOError};

pub fn load<T: DeserializeOwned>(path: &Path) -> miette::Result<T> {
    let text = fs::read_to_string(path).map_err(IOError::from)?;
    let case = toml::from_str(&text).map_err(|source| CaseError::Parse { path: path.to_owned(), source })?;
    Ok(case)
}

// Expressions
//
//

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    #[default]
    Type,
    Bool,
    Int64,
}

impl From<Kind> for ExprType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Type => ExprType::Type,
            Kind::Bool => ExprType::Bool,
            Kind::Int64 => ExprType::Int64,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum BinOpDesc {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

impl From<BinOpDesc> for BinOp {
    fn from(op: BinOpDesc) -> Self {
        match op {
            BinOpDesc::Eq => BinOp::Eq,
            BinOpDesc::Ne => BinOp::Ne,
            BinOpDesc::Lt => BinOp::Lt,
            BinOpDesc::Le => BinOp::Le,
            BinOpDesc::Gt => BinOp::Gt,
            BinOpDesc::Ge => BinOp::Ge,
            BinOpDesc::Add => BinOp::Add,
            BinOpDesc::Sub => BinOp::Sub,
            BinOpDesc::Mul => BinOp::Mul,
            BinOpDesc::Div => BinOp::Div,
            BinOpDesc::Mod => BinOp::Mod,
            BinOpDesc::And => BinOp::And,
            BinOpDesc::Or => BinOp::Or,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprDesc {
    Bool(bool),
    Int(i64),
    /// A builtin or toplevel class type, e.g. `int`
    Type(String),
    /// A toplevel `using` alias
    Alias(String),
    /// A type parameter or local definition
    Local(String),
    LocalBool(String),
    LocalInt(String),
    /// A type parameter pack, only valid inside an expansion
    Pack(String),
    Pointer(Box<ExprDesc>),
    Reference(Box<ExprDesc>),
    RvalueReference(Box<ExprDesc>),
    Const(Box<ExprDesc>),
    Array(Box<ExprDesc>),
    Function {
        returns: Box<ExprDesc>,
        #[serde(default)]
        args: Vec<ExprDesc>,
    },
    Instantiate {
        template: String,
        #[serde(default)]
        args: Vec<ExprDesc>,
    },
    Member {
        of: Box<ExprDesc>,
        name: String,
        #[serde(default)]
        kind: Kind,
    },
    Expand(Box<ExprDesc>),
    Binary {
        op: BinOpDesc,
        lhs: Box<ExprDesc>,
        rhs: Box<ExprDesc>,
    },
    Not(Box<ExprDesc>),
    Minus(Box<ExprDesc>),
}

/// The declared parameters of the templates a case defines, used to give
/// instantiations of those templates their precise kind.
#[derive(Debug, Default)]
pub struct Signatures {
    args_by_template: BTreeMap<String, Vec<TemplateArgType>>,
}

impl Signatures {
    pub fn new(templates: &[TemplateDesc]) -> Self {
        let args_by_template = templates
            .iter()
            .map(|template| {
                let args = template
                    .args
                    .iter()
                    .map(|arg| TemplateArgType { expr_type: arg.kind.into(), is_variadic: arg.variadic })
                    .collect();
                (template.name.clone(), args)
            })
            .collect();
        Self { args_by_template }
    }

    fn template_literal(&self, name: &str) -> AtomicTypeLiteral {
        // Templates that are not part of the case take any number of types.
        let args = self
            .args_by_template
            .get(name)
            .cloned()
            .unwrap_or_else(|| vec![TemplateArgType { expr_type: ExprType::Type, is_variadic: true }]);
        AtomicTypeLiteral::for_nonlocal_template(name, args, false, false)
    }
}

impl ExprDesc {
    pub fn lower(&self, sigs: &Signatures) -> Expr {
        match self {
            ExprDesc::Bool(b) => Literal::Bool(*b).into(),
            ExprDesc::Int(n) => Literal::Int64(*n).into(),
            ExprDesc::Type(name) => AtomicTypeLiteral::for_nonlocal_type(name, false).into(),
            ExprDesc::Alias(name) => AtomicTypeLiteral::for_nonlocal_type(name, true).into(),
            ExprDesc::Local(name) => AtomicTypeLiteral::for_local(name, ExprType::Type, false).into(),
            ExprDesc::LocalBool(name) => AtomicTypeLiteral::for_local(name, ExprType::Bool, false).into(),
            ExprDesc::LocalInt(name) => AtomicTypeLiteral::for_local(name, ExprType::Int64, false).into(),
            ExprDesc::Pack(name) => AtomicTypeLiteral::for_local(name, ExprType::Type, true).into(),
            ExprDesc::Pointer(inner) => ModifiedType::pointer(inner.lower(sigs)).into(),
            ExprDesc::Reference(inner) => ModifiedType::reference(inner.lower(sigs)).into(),
            ExprDesc::RvalueReference(inner) => ModifiedType::rvalue_reference(inner.lower(sigs)).into(),
            ExprDesc::Const(inner) => ModifiedType::constant(inner.lower(sigs)).into(),
            ExprDesc::Array(inner) => ModifiedType::array(inner.lower(sigs)).into(),
            ExprDesc::Function { returns, args } => FunctionType::new(returns.lower(sigs), lower_all(args, sigs)).into(),
            ExprDesc::Instantiate { template, args } => {
                TemplateInstantiation::new(sigs.template_literal(template).into(), lower_all(args, sigs)).into()
            }
            ExprDesc::Member { of, name, kind } => ClassMemberAccess::new(of.lower(sigs), name, (*kind).into()).into(),
            ExprDesc::Expand(inner) => VariadicTypeExpansion::new(inner.lower(sigs)).into(),
            ExprDesc::Binary { op, lhs, rhs } => BinaryOp::new((*op).into(), lhs.lower(sigs), rhs.lower(sigs)).into(),
            ExprDesc::Not(inner) => UnaryOp::new(UnOp::Not, inner.lower(sigs)).into(),
            ExprDesc::Minus(inner) => UnaryOp::new(UnOp::Minus, inner.lower(sigs)).into(),
        }
    }
}

fn lower_all(descs: &[ExprDesc], sigs: &Signatures) -> Vec<Expr> {
    descs.iter().map(|desc| desc.lower(sigs)).collect()
}

fn lower_locals(locals: &BTreeMap<String, ExprDesc>, sigs: &Signatures) -> BTreeMap<String, Expr> {
    locals.iter().map(|(name, desc)| (name.clone(), desc.lower(sigs))).collect()
}

// Templates
//
//

#[derive(Debug, Clone, Deserialize)]
pub struct ArgDesc {
    pub name: String,
    #[serde(default)]
    pub kind: Kind,
    #[serde(default)]
    pub variadic: bool,
}

impl ArgDesc {
    fn lower(&self) -> TemplateArgDecl {
        TemplateArgDecl::new(&self.name, self.kind.into(), self.variadic)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyDesc {
    Typedef {
        name: String,
        expr: ExprDesc,
    },
    Constant {
        name: String,
        expr: ExprDesc,
    },
    StaticAssert {
        expr: ExprDesc,
        #[serde(default)]
        message: String,
    },
}

impl BodyDesc {
    fn lower(&self, sigs: &Signatures) -> TemplateBodyElement {
        match self {
            BodyDesc::Typedef { name, expr } => {
                TemplateBodyElement::Typedef(Typedef { name: name.clone(), expr: expr.lower(sigs) })
            }
            BodyDesc::Constant { name, expr } => {
                TemplateBodyElement::ConstantDef(ConstantDef { name: name.clone(), expr: expr.lower(sigs) })
            }
            BodyDesc::StaticAssert { expr, message } => {
                TemplateBodyElement::StaticAssert(StaticAssert { expr: expr.lower(sigs), message: message.clone() })
            }
        }
    }
}

fn lower_body(body: &[BodyDesc], sigs: &Signatures) -> Vec<TemplateBodyElement> {
    body.iter().map(|elem| elem.lower(sigs)).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecializationDesc {
    #[serde(default)]
    pub args: Vec<ArgDesc>,
    pub patterns: Vec<ExprDesc>,
    pub body: Vec<BodyDesc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDesc {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub args: Vec<ArgDesc>,
    /// The body of the main definition; a template without one is only declared.
    #[serde(default)]
    pub main: Option<Vec<BodyDesc>>,
    #[serde(default)]
    pub specializations: Vec<SpecializationDesc>,
}

impl TemplateDesc {
    pub fn lower(&self, sigs: &Signatures) -> TemplateDefn {
        let args: Vec<TemplateArgDecl> = self.args.iter().map(ArgDesc::lower).collect();

        let main_definition = self.main.as_ref().map(|body| TemplateSpecialization {
            args: args.clone(),
            patterns: None,
            body: lower_body(body, sigs),
            is_metafunction: true,
        });
        let specializations: Vec<TemplateSpecialization> = self
            .specializations
            .iter()
            .map(|specialization| TemplateSpecialization {
                args: specialization.args.iter().map(ArgDesc::lower).collect(),
                patterns: Some(lower_all(&specialization.patterns, sigs)),
                body: lower_body(&specialization.body, sigs),
                is_metafunction: true,
            })
            .collect();
        let result_element_names: BTreeSet<String> = main_definition
            .iter()
            .chain(specializations.iter())
            .flat_map(|specialization| specialization.body.iter().filter_map(|elem| elem.definition()))
            .map(|(name, _)| name.to_owned())
            .collect();

        TemplateDefn {
            name: self.name.clone(),
            description: self.description.clone(),
            args,
            main_definition,
            specializations,
            result_element_names,
        }
    }
}

// Cases
//
//

fn default_result() -> String {
    "type".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstantiationDesc {
    pub template: String,
    #[serde(default)]
    pub args: Vec<ExprDesc>,
    #[serde(default)]
    pub locals: BTreeMap<String, ExprDesc>,
    /// The member of the instantiation that is used
    #[serde(default = "default_result")]
    pub result: String,
}

pub struct Instantiation {
    pub instantiation: TemplateInstantiation,
    pub locals: BTreeMap<String, Expr>,
    pub result: String,
}

impl InstantiationDesc {
    pub fn lower(&self, sigs: &Signatures) -> Instantiation {
        let template = sigs.template_literal(&self.template).into();
        let instantiation = TemplateInstantiation::new(template, lower_all(&self.args, sigs));
        Instantiation { instantiation, locals: lower_locals(&self.locals, sigs), result: self.result.clone() }
    }
}

/// Templates and instantiations of them that should be resolved in order.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchCase {
    #[serde(default)]
    pub max_steps: Option<usize>,
    #[serde(default)]
    pub templates: Vec<TemplateDesc>,
    pub instantiations: Vec<InstantiationDesc>,
}

impl MatchCase {
    pub fn lower(&self) -> Result<(Vec<TemplateDefn>, Vec<Instantiation>), CaseError> {
        let sigs = Signatures::new(&self.templates);
        let mut names = BTreeSet::new();
        let mut templates = Vec::new();
        for template in &self.templates {
            if !names.insert(template.name.as_str()) {
                return Err(CaseError::DuplicateTemplate { name: template.name.clone() });
            }
            templates.push(template.lower(&sigs));
        }
        let instantiations = self.instantiations.iter().map(|inst| inst.lower(&sigs)).collect();
        Ok((templates, instantiations))
    }
}

/// A single call of the expression unifier.
#[derive(Debug, Clone, Deserialize)]
pub struct UnifyCase {
    pub exprs: Vec<ExprDesc>,
    pub patterns: Vec<ExprDesc>,
    #[serde(default)]
    pub locals: BTreeMap<String, ExprDesc>,
    #[serde(default)]
    pub expr_variables: BTreeSet<String>,
    #[serde(default)]
    pub pattern_variables: BTreeSet<String>,
}

pub struct Unification {
    pub exprs: Vec<Expr>,
    pub patterns: Vec<Expr>,
    pub locals: BTreeMap<String, Expr>,
}

impl UnifyCase {
    pub fn lower(&self) -> Unification {
        let sigs = Signatures::default();
        Unification {
            exprs: lower_all(&self.exprs, &sigs),
            patterns: lower_all(&self.patterns, &sigs),
            locals: lower_locals(&self.locals, &sigs),
        }
    }
}
