use std::collections::BTreeMap;

use log::debug;

use ir::{Expr, TemplateDefn, TemplateInstantiation};

use crate::result::MatchResult;
use crate::{IdentifierGenerator, Resolution, Undecided, resolve};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// How many instantiations may be resolved before the session gives up.
    /// `None` means no limit.
    pub max_steps: Option<usize>,
}

/// The state shared by all template lookups of one compilation.
#[derive(Debug, Clone, Default)]
pub struct CompilerSession {
    ids: IdentifierGenerator,
    templates: BTreeMap<String, TemplateDefn>,
    config: OptimizerConfig,
    steps: usize,
}

impl CompilerSession {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config, ..Default::default() }
    }

    /// Use `ids` for the fresh names, e.g. to continue the numbering of an earlier session.
    pub fn with_ids(mut self, ids: IdentifierGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Make `defn` available to instantiations. A template with the same name is replaced.
    pub fn add_template(&mut self, defn: TemplateDefn) {
        self.templates.insert(defn.name.clone(), defn);
    }

    pub fn template(&self, name: &str) -> Option<&TemplateDefn> {
        self.templates.get(name)
    }

    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    pub fn ids(&self) -> &IdentifierGenerator {
        &self.ids
    }

    /// Decide what `instantiation` evaluates to when used for its member
    /// `result_element_name`.
    ///
    /// Every call spends one step, whether or not it reaches a decision.
    pub fn resolve_instantiation(
        &mut self,
        instantiation: &TemplateInstantiation,
        locals: &BTreeMap<String, Expr>,
        result_element_name: &str,
    ) -> MatchResult<Resolution> {
        if self.config.max_steps.is_some_and(|max_steps| self.steps >= max_steps) {
            debug!("Not resolving further instantiations after {} steps", self.steps);
            return Ok(Resolution::CannotDecide(Undecided::BudgetExhausted));
        }
        self.steps += 1;

        let Some(defn) = instantiation.template_name().and_then(|name| self.templates.get(name)) else {
            debug!("No definition for the template of {:?}", instantiation.template_name());
            return Ok(Resolution::CannotDecide(Undecided::UnknownTemplate));
        };
        resolve(&instantiation.args, locals, result_element_name, defn, &mut self.ids)
    }
}

#[cfg(test)]
mod test {
    use ir::{
        AtomicTypeLiteral, ConstantDef, ExprType, Literal, ModifiedType, TemplateArgDecl,
        TemplateBodyElement, TemplateSpecialization,
    };

    use super::*;

    fn value(b: bool) -> Vec<TemplateBodyElement> {
        let expr = Literal::Bool(b).into();
        vec![TemplateBodyElement::ConstantDef(ConstantDef { name: "value".to_owned(), expr })]
    }

    fn t() -> Expr {
        AtomicTypeLiteral::for_local("T", ExprType::Type, false).into()
    }

    /// `IsPointer<T>` with the specialization `IsPointer<T*>`.
    fn is_pointer() -> TemplateDefn {
        let args = vec![TemplateArgDecl::new("T", ExprType::Type, false)];
        TemplateDefn {
            name: "IsPointer".to_owned(),
            description: String::new(),
            args: args.clone(),
            main_definition: Some(TemplateSpecialization {
                args: args.clone(),
                patterns: None,
                body: value(false),
                is_metafunction: true,
            }),
            specializations: vec![TemplateSpecialization {
                args,
                patterns: Some(vec![ModifiedType::pointer(t()).into()]),
                body: value(true),
                is_metafunction: true,
            }],
            result_element_names: ["value".to_owned()].into(),
        }
    }

    fn instantiate(name: &str, arg: Expr) -> TemplateInstantiation {
        let template = AtomicTypeLiteral::for_nonlocal_template(
            name,
            vec![ir::TemplateArgType { expr_type: ExprType::Type, is_variadic: false }],
            false,
            false,
        );
        TemplateInstantiation::new(template.into(), vec![arg])
    }

    fn int() -> Expr {
        AtomicTypeLiteral::for_nonlocal_type("int", false).into()
    }

    #[test]
    fn known_instantiations_are_resolved() {
        let mut session = CompilerSession::new(OptimizerConfig::default());
        session.add_template(is_pointer());

        let instantiation = instantiate("IsPointer", ModifiedType::pointer(int()).into());
        let resolution = session.resolve_instantiation(&instantiation, &BTreeMap::new(), "value");
        assert_eq!(resolution, Ok(Resolution::Constant(Literal::Bool(true).into())));

        let instantiation = instantiate("IsPointer", int());
        let resolution = session.resolve_instantiation(&instantiation, &BTreeMap::new(), "value");
        assert_eq!(resolution, Ok(Resolution::Constant(Literal::Bool(false).into())));
        assert_eq!(session.steps_taken(), 2);
    }

    #[test]
    fn unknown_templates_are_undecided() {
        let mut session = CompilerSession::new(OptimizerConfig::default());
        let instantiation = instantiate("IsPointer", int());
        let resolution = session.resolve_instantiation(&instantiation, &BTreeMap::new(), "value");
        assert_eq!(resolution, Ok(Resolution::CannotDecide(Undecided::UnknownTemplate)));
    }

    #[test]
    fn budget_is_enforced() {
        let mut session = CompilerSession::new(OptimizerConfig { max_steps: Some(1) });
        session.add_template(is_pointer());
        let instantiation = instantiate("IsPointer", int());

        let first = session.resolve_instantiation(&instantiation, &BTreeMap::new(), "value");
        assert!(matches!(first, Ok(Resolution::Constant(_))));
        let second = session.resolve_instantiation(&instantiation, &BTreeMap::new(), "value");
        assert_eq!(second, Ok(Resolution::CannotDecide(Undecided::BudgetExhausted)));
        assert_eq!(session.steps_taken(), 1);
    }

    #[test]
    fn fresh_names_continue_across_calls() {
        let mut session = CompilerSession::new(OptimizerConfig::default())
            .with_ids(IdentifierGenerator::starting_at(10));
        session.add_template(is_pointer());
        let instantiation = instantiate("IsPointer", int());
        let _ = session.resolve_instantiation(&instantiation, &BTreeMap::new(), "value");
        assert!(session.ids().counter() > 10);
    }
}
