//! The fixed catalog query suite.
//!
//! Each method builds a [`Query`] or [`GroupQuery`] from its arguments,
//! runs it through [`QueryExecutor`], and maps the rows to typed ids.

use hwcatalog_foundation::{
    CompanyId, EntityId, EntityKind, Error, LaptopId, ProcessorId, Result, Value,
};
use hwcatalog_storage::{Catalog, EntityRef};

use crate::config::QueryConfig;
use crate::group::Aggregate;
use crate::predicate::{
    Attribute, CmpOp, Collection, Link, Operand, Params, Path, Predicate, Range,
};
use crate::query::{GroupQuery, Query, QueryExecutor};
use crate::sort::OrderKey;

/// A laptop whose processor is made by the laptop's own maker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InHouseLaptop {
    /// Human-readable description of the laptop.
    pub description: String,
    /// The laptop.
    pub laptop: LaptopId,
    /// Its processor.
    pub processor: ProcessorId,
    /// The company making both.
    pub company: CompanyId,
}

/// Per-company laptop statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct CompanySummary {
    /// The company.
    pub company: CompanyId,
    /// How many laptops it makes.
    pub laptop_count: usize,
    /// Slowest processor clock speed among its laptops, in GHz.
    pub min_clock_speed: f64,
    /// Largest memory size among its laptops, in GB.
    pub max_memory_size: i64,
}

/// Runs the catalog queries against one snapshot.
#[derive(Clone, Debug)]
pub struct CatalogQueries<'a> {
    catalog: &'a Catalog,
    config: QueryConfig,
}

impl<'a> CatalogQueries<'a> {
    /// Queries `catalog` with the default configuration.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_config(catalog, QueryConfig::default())
    }

    /// Queries `catalog` with the given configuration.
    #[must_use]
    pub fn with_config(catalog: &'a Catalog, config: QueryConfig) -> Self {
        Self { catalog, config }
    }

    /// Companies making at least one laptop whose processor runs at
    /// `min_clock_speed` GHz or faster and whose memory holds `min_memory`
    /// GB or more. Sorted by company name.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if the configured result bound is exceeded.
    pub fn companies_by_speed_and_memory(
        &self,
        min_clock_speed: f64,
        min_memory: i64,
    ) -> Result<Vec<CompanyId>> {
        let params = Params::new()
            .with("c", min_clock_speed)
            .with("s", min_memory);
        let rows = self.run(&speed_and_memory(), &params)?;
        rows.into_iter().map(company_id).collect()
    }

    /// Companies with two laptops whose processors come from different
    /// makers. Sorted by company name.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if the configured result bound is exceeded.
    pub fn companies_with_mixed_processors(&self) -> Result<Vec<CompanyId>> {
        let rows = self.run(&mixed_processors(), &Params::new())?;
        rows.into_iter().map(company_id).collect()
    }

    /// HD-screen laptops with at least `min_capacity` GB of storage.
    /// Sorted by capacity, then model name.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if the configured result bound is exceeded.
    pub fn hd_laptops_with_storage(&self, min_capacity: i64) -> Result<Vec<LaptopId>> {
        let params = Params::new().with("x", min_capacity);
        let rows = self.run(&hd_with_storage(), &params)?;
        rows.into_iter().map(laptop_id).collect()
    }

    /// Laptops with a processor of at least `min_clock_speed` GHz priced in
    /// `[min_price, max_price]`. Sorted by clock speed, price, model name.
    ///
    /// An inverted price range matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if the configured result bound is exceeded.
    pub fn laptops_by_speed_and_price(
        &self,
        min_clock_speed: f64,
        min_price: i64,
        max_price: i64,
    ) -> Result<Vec<LaptopId>> {
        let params = Params::new()
            .with("c", min_clock_speed)
            .with("p1", min_price)
            .with("p2", max_price);
        let rows = self.run(&speed_and_price(), &params)?;
        rows.into_iter().map(laptop_id).collect()
    }

    /// Laptops whose processor is made by the company named `company_name`.
    /// Sorted by laptop maker name, then model name.
    ///
    /// An unknown company name matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if the configured result bound is exceeded.
    pub fn laptops_with_processor_from(&self, company_name: &str) -> Result<Vec<LaptopId>> {
        let params = Params::new().with("cName", company_name);
        let rows = self.run(&processor_from(), &params)?;
        rows.into_iter().map(laptop_id).collect()
    }

    /// Laptops whose processor is made by the laptop's own maker, with the
    /// processor and company. Sorted by maker name, then model name.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if the configured result bound is exceeded.
    pub fn laptops_with_in_house_processor(&self) -> Result<Vec<InHouseLaptop>> {
        let columns = [Path::this().via(Link::Processor), Path::this().via(Link::MadeBy)];
        let rows = QueryExecutor::project(
            &in_house_processor(),
            &columns,
            self.catalog,
            &Params::new(),
            &self.config,
        )?;
        rows.into_iter()
            .map(|row| {
                let [processor, company] = row.columns.as_slice() else {
                    return Err(Error::internal("in-house projection lost a column"));
                };
                Ok(InHouseLaptop {
                    description: row.entity.to_string(),
                    laptop: laptop_id(row.entity)?,
                    processor: ProcessorId::from_entity(entity_of(processor, EntityKind::Processor)?),
                    company: CompanyId::from_entity(entity_of(company, EntityKind::Company)?),
                })
            })
            .collect()
    }

    /// Laptops whose processor is also installed in some other laptop.
    /// Sorted by maker name, then model name.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if the configured result bound is exceeded.
    pub fn laptops_sharing_processor(&self) -> Result<Vec<LaptopId>> {
        let rows = self.run(&sharing_processor(), &Params::new())?;
        rows.into_iter().map(laptop_id).collect()
    }

    /// One summary per company making at least one laptop. Sorted by
    /// company name.
    ///
    /// # Errors
    ///
    /// Returns `BrokenInvariant` if a laptop has no maker, and
    /// `LimitExceeded` if the configured result bound is exceeded.
    pub fn laptops_grouped_by_company(&self) -> Result<Vec<CompanySummary>> {
        let groups = QueryExecutor::execute_grouped(
            &by_company(),
            self.catalog,
            &Params::new(),
            &self.config,
        )?;
        groups
            .into_iter()
            .map(|group| {
                let [count, min_speed, max_memory] = group.values.as_slice() else {
                    return Err(Error::internal("company summary lost an aggregate"));
                };
                Ok(CompanySummary {
                    company: company_id(group.key)?,
                    laptop_count: count
                        .as_int()
                        .and_then(|n| usize::try_from(n).ok())
                        .ok_or_else(|| Error::internal("laptop count is not a count"))?,
                    min_clock_speed: min_speed
                        .as_number()
                        .ok_or_else(|| Error::broken_invariant("group has no clock speed"))?,
                    max_memory_size: max_memory
                        .as_int()
                        .ok_or_else(|| Error::broken_invariant("group has no memory size"))?,
                })
            })
            .collect()
    }

    /// The laptop with the given model name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no laptop has that model name.
    pub fn find_laptop(&self, model_name: &str) -> Result<LaptopId> {
        self.catalog.find_laptop_by_model(model_name).map(|laptop| laptop.id())
    }

    /// The company with the given name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no company has that name.
    pub fn find_company(&self, name: &str) -> Result<CompanyId> {
        self.catalog.find_company(name).map(|company| company.id())
    }

    fn run(&self, query: &Query, params: &Params) -> Result<Vec<EntityRef<'a>>> {
        QueryExecutor::execute(query, self.catalog, params, &self.config)
    }
}

// =============================================================================
// Query definitions
// =============================================================================

fn laptop_attr(var: &str, link: Link, attribute: Attribute) -> Path {
    Path::var(var).via(link).attr(attribute)
}

fn by_name() -> OrderKey {
    OrderKey::asc(Path::this().attr(Attribute::Name))
}

fn by_maker_then_model() -> [OrderKey; 2] {
    [
        OrderKey::asc(Path::this().via(Link::MadeBy).attr(Attribute::Name)),
        OrderKey::asc(Path::this().attr(Attribute::ModelName)),
    ]
}

fn speed_and_memory() -> Query {
    Query::new("companiesBySpeedAndMemory", EntityKind::Company)
        .filter(Predicate::exists(
            "l",
            Range::collection(Path::this(), Collection::MakeLaptops),
            Predicate::all([
                Predicate::compare(
                    laptop_attr("l", Link::Processor, Attribute::ClockSpeed),
                    CmpOp::Ge,
                    Operand::param("c"),
                ),
                Predicate::compare(
                    laptop_attr("l", Link::Memory, Attribute::Size),
                    CmpOp::Ge,
                    Operand::param("s"),
                ),
            ]),
        ))
        .order_by(by_name())
}

fn mixed_processors() -> Query {
    let maker = |var: &str| {
        Path::var(var)
            .via(Link::Processor)
            .via(Link::MadeBy)
            .attr(Attribute::Name)
    };
    Query::new("companiesWithMixedProcessors", EntityKind::Company)
        .filter(Predicate::all([
            Predicate::size(Path::this(), Collection::MakeLaptops, CmpOp::Ge, 2),
            Predicate::exists_distinct_pair(
                "l1",
                "l2",
                Range::collection(Path::this(), Collection::MakeLaptops),
                Predicate::compare(maker("l1"), CmpOp::Ne, maker("l2")),
            ),
        ]))
        .order_by(by_name())
}

fn hd_with_storage() -> Query {
    Query::new("hdLaptopsWithStorage", EntityKind::Laptop)
        .filter(Predicate::all([
            Predicate::compare(
                Path::this().attr(Attribute::HasHdScreen),
                CmpOp::Eq,
                Operand::value(true),
            ),
            Predicate::compare(
                Path::this().attr(Attribute::HardDriveCapacity),
                CmpOp::Ge,
                Operand::param("x"),
            ),
        ]))
        .order_by(OrderKey::asc(Path::this().attr(Attribute::HardDriveCapacity)))
        .order_by(OrderKey::asc(Path::this().attr(Attribute::ModelName)))
}

fn speed_and_price() -> Query {
    let price = || Path::this().attr(Attribute::Price);
    let speed = || Path::this().via(Link::Processor).attr(Attribute::ClockSpeed);
    Query::new("laptopsBySpeedAndPrice", EntityKind::Laptop)
        .filter(Predicate::all([
            Predicate::compare(speed(), CmpOp::Ge, Operand::param("c")),
            Predicate::compare(price(), CmpOp::Ge, Operand::param("p1")),
            Predicate::compare(price(), CmpOp::Le, Operand::param("p2")),
        ]))
        .order_by(OrderKey::asc(speed()))
        .order_by(OrderKey::asc(price()))
        .order_by(OrderKey::asc(Path::this().attr(Attribute::ModelName)))
}

fn processor_from() -> Query {
    let [maker, model] = by_maker_then_model();
    Query::new("laptopsWithProcessorFrom", EntityKind::Laptop)
        .filter(Predicate::compare(
            Path::this()
                .via(Link::Processor)
                .via(Link::MadeBy)
                .attr(Attribute::Name),
            CmpOp::Eq,
            Operand::param("cName"),
        ))
        .order_by(maker)
        .order_by(model)
}

fn in_house_processor() -> Query {
    let [maker, model] = by_maker_then_model();
    Query::new("laptopsWithInHouseProcessor", EntityKind::Laptop)
        .filter(Predicate::compare(
            Path::this().via(Link::MadeBy),
            CmpOp::Eq,
            Path::this().via(Link::Processor).via(Link::MadeBy),
        ))
        .order_by(maker)
        .order_by(model)
}

fn sharing_processor() -> Query {
    let [maker, model] = by_maker_then_model();
    Query::new("laptopsSharingProcessor", EntityKind::Laptop)
        .filter(Predicate::exists(
            "l1",
            Range::collection(Path::this().via(Link::Processor), Collection::InstalledIn),
            Predicate::all([
                Predicate::compare(
                    Path::var("l1").via(Link::Processor),
                    CmpOp::Eq,
                    Path::this().via(Link::Processor),
                ),
                Predicate::compare(Path::var("l1"), CmpOp::Ne, Path::this()),
            ]),
        ))
        .order_by(maker)
        .order_by(model)
}

fn by_company() -> GroupQuery {
    GroupQuery::new(
        "laptopsGroupedByCompany",
        EntityKind::Laptop,
        Path::this().via(Link::MadeBy),
    )
    .aggregate(Aggregate::Count)
    .aggregate(Aggregate::Min(
        Path::this().via(Link::Processor).attr(Attribute::ClockSpeed),
    ))
    .aggregate(Aggregate::Max(
        Path::this().via(Link::Memory).attr(Attribute::Size),
    ))
    .order_by(by_name())
}

// =============================================================================
// Row conversion
// =============================================================================

fn company_id(row: EntityRef<'_>) -> Result<CompanyId> {
    match row {
        EntityRef::Company(company) => Ok(company.id()),
        other => Err(Error::internal(format!("expected a company, got {}", other.kind()))),
    }
}

fn laptop_id(row: EntityRef<'_>) -> Result<LaptopId> {
    match row {
        EntityRef::Laptop(laptop) => Ok(laptop.id()),
        other => Err(Error::internal(format!("expected a laptop, got {}", other.kind()))),
    }
}

fn entity_of(value: &Value, kind: EntityKind) -> Result<EntityId> {
    match value {
        Value::Entity(actual, id) if *actual == kind => Ok(*id),
        Value::Nil => Err(Error::broken_invariant(format!("missing {kind} link"))),
        other => Err(Error::internal(format!("expected a {kind}, got {}", other.value_type()))),
    }
}
