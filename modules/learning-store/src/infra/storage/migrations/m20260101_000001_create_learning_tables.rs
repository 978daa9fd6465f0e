//! Initial schema: one table per entity, unique indexes on natural keys.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id<T: Iden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().primary_key().to_owned()
}

fn tenant<T: Iden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().to_owned()
}

fn text<T: Iden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col).string().not_null().to_owned()
}

fn opt_text<T: Iden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col).string().null().to_owned()
}

fn flag<T: Iden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col).boolean().not_null().default(false).to_owned()
}

fn int<T: Iden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().default(0).to_owned()
}

fn json<T: Iden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col).json_binary().not_null().to_owned()
}

fn ts<T: Iden + 'static>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn unique_index<T: Iden + Copy + 'static>(name: &str, table: T, cols: &[T]) -> IndexCreateStatement {
    let mut idx = Index::create();
    idx.name(name).table(table).unique().if_not_exists();
    for col in cols {
        idx.col(*col);
    }
    idx.to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sites::Table)
                    .if_not_exists()
                    .col(id(Sites::Id))
                    .col(text(Sites::Name))
                    .col(text(Sites::Host))
                    .col(text(Sites::Title))
                    .col(json(Sites::Tags))
                    .col(ts(Sites::CreatedAt))
                    .col(ts(Sites::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index("ux_sites_name", Sites::Table, &[Sites::Name]))
            .await?;
        manager
            .create_index(unique_index("ux_sites_host", Sites::Table, &[Sites::Host]))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id(Users::Id))
                    .col(tenant(Users::Domain))
                    .col(text(Users::UserId))
                    .col(text(Users::Email))
                    .col(opt_text(Users::Name))
                    .col(flag(Users::Active))
                    .col(json(Users::Permissions))
                    .col(json(Users::Tags))
                    .col(json(Users::Purchases))
                    .col(ts(Users::CreatedAt))
                    .col(ts(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index(
                "ux_users_domain_user_id",
                Users::Table,
                &[Users::Domain, Users::UserId],
            ))
            .await?;
        manager
            .create_index(unique_index(
                "ux_users_domain_email",
                Users::Table,
                &[Users::Domain, Users::Email],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(id(Courses::Id))
                    .col(tenant(Courses::Domain))
                    .col(text(Courses::CourseId))
                    .col(text(Courses::Title))
                    .col(text(Courses::Slug))
                    .col(text(Courses::Kind))
                    .col(flag(Courses::Published))
                    .col(int(Courses::Cost))
                    .col(text(Courses::CreatorId))
                    .col(json(Courses::Lessons))
                    .col(json(Courses::Groups))
                    .col(ts(Courses::CreatedAt))
                    .col(ts(Courses::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index(
                "ux_courses_domain_course_id",
                Courses::Table,
                &[Courses::Domain, Courses::CourseId],
            ))
            .await?;
        manager
            .create_index(unique_index(
                "ux_courses_domain_slug",
                Courses::Table,
                &[Courses::Domain, Courses::Slug],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(id(Lessons::Id))
                    .col(tenant(Lessons::Domain))
                    .col(text(Lessons::LessonId))
                    .col(text(Lessons::CourseId))
                    .col(text(Lessons::GroupId))
                    .col(text(Lessons::Title))
                    .col(text(Lessons::Kind))
                    .col(json(Lessons::Content))
                    .col(flag(Lessons::RequiresEnrollment))
                    .col(flag(Lessons::Published))
                    .col(ts(Lessons::CreatedAt))
                    .col(ts(Lessons::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index(
                "ux_lessons_domain_lesson_id",
                Lessons::Table,
                &[Lessons::Domain, Lessons::LessonId],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Memberships::Table)
                    .if_not_exists()
                    .col(id(Memberships::Id))
                    .col(tenant(Memberships::Domain))
                    .col(text(Memberships::MembershipId))
                    .col(text(Memberships::UserId))
                    .col(text(Memberships::EntityId))
                    .col(text(Memberships::EntityType))
                    .col(text(Memberships::Status))
                    .col(opt_text(Memberships::PaymentPlanId))
                    .col(json(Memberships::IncludedProducts))
                    .col(ts(Memberships::CreatedAt))
                    .col(ts(Memberships::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index(
                "ux_memberships_domain_membership_id",
                Memberships::Table,
                &[Memberships::Domain, Memberships::MembershipId],
            ))
            .await?;
        manager
            .create_index(unique_index(
                "ux_memberships_user_entity",
                Memberships::Table,
                &[
                    Memberships::Domain,
                    Memberships::UserId,
                    Memberships::EntityId,
                    Memberships::EntityType,
                ],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Communities::Table)
                    .if_not_exists()
                    .col(id(Communities::Id))
                    .col(tenant(Communities::Domain))
                    .col(text(Communities::CommunityId))
                    .col(text(Communities::Name))
                    .col(opt_text(Communities::Description))
                    .col(flag(Communities::Enabled))
                    .col(json(Communities::Categories))
                    .col(opt_text(Communities::DefaultPaymentPlan))
                    .col(flag(Communities::Deleted))
                    .col(ts(Communities::CreatedAt))
                    .col(ts(Communities::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index(
                "ux_communities_domain_community_id",
                Communities::Table,
                &[Communities::Domain, Communities::CommunityId],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(id(Invoices::Id))
                    .col(tenant(Invoices::Domain))
                    .col(text(Invoices::InvoiceId))
                    .col(text(Invoices::MembershipId))
                    .col(text(Invoices::PaymentPlanId))
                    .col(int(Invoices::Amount))
                    .col(text(Invoices::Currency))
                    .col(text(Invoices::Status))
                    .col(text(Invoices::PaymentProcessor))
                    .col(opt_text(Invoices::ProcessorTransactionId))
                    .col(ts(Invoices::CreatedAt))
                    .col(ts(Invoices::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index(
                "ux_invoices_domain_invoice_id",
                Invoices::Table,
                &[Invoices::Domain, Invoices::InvoiceId],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sequences::Table)
                    .if_not_exists()
                    .col(id(Sequences::Id))
                    .col(tenant(Sequences::Domain))
                    .col(text(Sequences::SequenceId))
                    .col(text(Sequences::Title))
                    .col(text(Sequences::Kind))
                    .col(text(Sequences::Status))
                    .col(text(Sequences::CreatorId))
                    .col(json(Sequences::Trigger))
                    .col(json(Sequences::Emails))
                    .col(json(Sequences::Entrants))
                    .col(ts(Sequences::CreatedAt))
                    .col(ts(Sequences::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index(
                "ux_sequences_domain_sequence_id",
                Sequences::Table,
                &[Sequences::Domain, Sequences::SequenceId],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentPlans::Table)
                    .if_not_exists()
                    .col(id(PaymentPlans::Id))
                    .col(tenant(PaymentPlans::Domain))
                    .col(text(PaymentPlans::PlanId))
                    .col(text(PaymentPlans::Name))
                    .col(text(PaymentPlans::Kind))
                    .col(text(PaymentPlans::EntityId))
                    .col(text(PaymentPlans::EntityType))
                    .col(int(PaymentPlans::Amount))
                    .col(flag(PaymentPlans::Archived))
                    .col(ts(PaymentPlans::CreatedAt))
                    .col(ts(PaymentPlans::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index(
                "ux_payment_plans_domain_plan_id",
                PaymentPlans::Table,
                &[PaymentPlans::Domain, PaymentPlans::PlanId],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ApiKeys::Table)
                    .if_not_exists()
                    .col(id(ApiKeys::Id))
                    .col(tenant(ApiKeys::Domain))
                    .col(text(ApiKeys::Key))
                    .col(text(ApiKeys::Name))
                    .col(opt_text(ApiKeys::Purpose))
                    .col(ts(ApiKeys::CreatedAt))
                    .col(ts(ApiKeys::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index(
                "ux_api_keys_domain_key",
                ApiKeys::Table,
                &[ApiKeys::Domain, ApiKeys::Key],
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApiKeys::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentPlans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sequences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Communities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Memberships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sites::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Sites {
    Table,
    Id,
    Name,
    Host,
    Title,
    Tags,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Users {
    Table,
    Id,
    Domain,
    UserId,
    Email,
    Name,
    Active,
    Permissions,
    Tags,
    Purchases,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Courses {
    Table,
    Id,
    Domain,
    CourseId,
    Title,
    Slug,
    Kind,
    Published,
    Cost,
    CreatorId,
    Lessons,
    Groups,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Lessons {
    Table,
    Id,
    Domain,
    LessonId,
    CourseId,
    GroupId,
    Title,
    Kind,
    Content,
    RequiresEnrollment,
    Published,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Memberships {
    Table,
    Id,
    Domain,
    MembershipId,
    UserId,
    EntityId,
    EntityType,
    Status,
    PaymentPlanId,
    IncludedProducts,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Communities {
    Table,
    Id,
    Domain,
    CommunityId,
    Name,
    Description,
    Enabled,
    Categories,
    DefaultPaymentPlan,
    Deleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Invoices {
    Table,
    Id,
    Domain,
    InvoiceId,
    MembershipId,
    PaymentPlanId,
    Amount,
    Currency,
    Status,
    PaymentProcessor,
    ProcessorTransactionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Sequences {
    Table,
    Id,
    Domain,
    SequenceId,
    Title,
    Kind,
    Status,
    CreatorId,
    Trigger,
    Emails,
    Entrants,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum PaymentPlans {
    Table,
    Id,
    Domain,
    PlanId,
    Name,
    Kind,
    EntityId,
    EntityType,
    Amount,
    Archived,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum ApiKeys {
    Table,
    Id,
    Domain,
    Key,
    Name,
    Purpose,
    CreatedAt,
    UpdatedAt,
}
