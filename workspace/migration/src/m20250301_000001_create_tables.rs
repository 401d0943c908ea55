use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create price_settings table (singleton row, id = 1)
        manager
            .create_table(
                Table::create()
                    .table(PriceSettings::Table)
                    .if_not_exists()
                    .col(pk_auto(PriceSettings::Id))
                    .col(integer_null(PriceSettings::ElPriceOreKwh))
                    .col(double_null(PriceSettings::DieselPriceSekLitre))
                    .col(double_null(PriceSettings::BensinPriceSekLitre))
                    .col(integer_null(PriceSettings::YearlyKm))
                    .col(integer_null(PriceSettings::DailyCommuteKm))
                    .col(double_null(PriceSettings::ChargingLossPct))
                    .col(integer_null(PriceSettings::TireLifespanYears))
                    .col(double_null(PriceSettings::DownpaymentSek))
                    .col(double_null(PriceSettings::InterestRatePct))
                    .to_owned(),
            )
            .await?;

        // Create cars table
        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(pk_auto(Cars::Id))
                    .col(string(Cars::Model))
                    .col(integer(Cars::Year))
                    .col(string_len(Cars::VehicleType, 10))
                    .col(double_null(Cars::ConsumptionKwhPer100km))
                    .col(double_null(Cars::ConsumptionLPer100km))
                    .col(double_null(Cars::BatteryCapacityKwh))
                    .col(double(Cars::EstimatedPurchasePrice))
                    .col(double(Cars::SummerTiresPrice))
                    .col(double(Cars::WinterTiresPrice))
                    .col(integer_null(Cars::TireReplacementIntervalYears))
                    .col(double_null(Cars::FullInsuranceYear))
                    .col(double_null(Cars::HalfInsuranceYear))
                    .col(double_null(Cars::CarTaxYear))
                    .col(double_null(Cars::RepairsYear))
                    .col(double_null(Cars::ExpectedValueAfter3y))
                    .col(double_null(Cars::ExpectedValueAfter5y))
                    .col(double_null(Cars::ExpectedValueAfter8y))
                    .col(double_null(Cars::Tco3Years))
                    .col(double_null(Cars::Tco5Years))
                    .col(double_null(Cars::Tco8Years))
                    .to_owned(),
            )
            .await?;

        // Create months table
        manager
            .create_table(
                Table::create()
                    .table(Months::Table)
                    .if_not_exists()
                    .col(pk_auto(Months::Id))
                    .col(date(Months::MonthDate))
                    .col(decimal_len(Months::StartingFunds, 16, 4))
                    .col(decimal_len(Months::EndingFunds, 16, 4))
                    .col(decimal_len(Months::Surplus, 16, 4))
                    .col(decimal_len(Months::LoanRemaining, 16, 4))
                    .col(boolean(Months::IsCurrent).default(false))
                    .to_owned(),
            )
            .await?;

        // Create incomes table
        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(pk_auto(Incomes::Id))
                    .col(integer(Incomes::MonthId))
                    .col(string_null(Incomes::Source))
                    .col(string_null(Incomes::Person))
                    .col(decimal_len(Incomes::Amount, 16, 4))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_income_month")
                            .from(Incomes::Table, Incomes::MonthId)
                            .to(Months::Table, Months::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create expenses table
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(pk_auto(Expenses::Id))
                    .col(integer(Expenses::MonthId))
                    .col(string_null(Expenses::Name))
                    .col(string_null(Expenses::Category))
                    .col(decimal_len(Expenses::Amount, 16, 4))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_month")
                            .from(Expenses::Table, Expenses::MonthId)
                            .to(Months::Table, Months::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create loan_adjustments table
        manager
            .create_table(
                Table::create()
                    .table(LoanAdjustments::Table)
                    .if_not_exists()
                    .col(pk_auto(LoanAdjustments::Id))
                    .col(integer(LoanAdjustments::MonthId))
                    .col(string_null(LoanAdjustments::Name))
                    .col(string_len(LoanAdjustments::Kind, 20))
                    .col(decimal_len(LoanAdjustments::Amount, 16, 4))
                    .col(string_null(LoanAdjustments::Note))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loan_adjustment_month")
                            .from(LoanAdjustments::Table, LoanAdjustments::MonthId)
                            .to(Months::Table, Months::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create financing table
        manager
            .create_table(
                Table::create()
                    .table(Financing::Table)
                    .if_not_exists()
                    .col(pk_auto(Financing::Id))
                    .col(string(Financing::Name).unique_key())
                    .col(decimal_len(Financing::Value, 16, 4))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Financing::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LoanAdjustments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Months::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PriceSettings::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum PriceSettings {
    Table,
    Id,
    ElPriceOreKwh,
    DieselPriceSekLitre,
    BensinPriceSekLitre,
    YearlyKm,
    DailyCommuteKm,
    ChargingLossPct,
    TireLifespanYears,
    DownpaymentSek,
    InterestRatePct,
}

#[derive(DeriveIden)]
enum Cars {
    Table,
    Id,
    Model,
    Year,
    VehicleType,
    #[sea_orm(iden = "consumption_kwh_per_100km")]
    ConsumptionKwhPer100km,
    #[sea_orm(iden = "consumption_l_per_100km")]
    ConsumptionLPer100km,
    BatteryCapacityKwh,
    EstimatedPurchasePrice,
    SummerTiresPrice,
    WinterTiresPrice,
    TireReplacementIntervalYears,
    FullInsuranceYear,
    HalfInsuranceYear,
    CarTaxYear,
    RepairsYear,
    #[sea_orm(iden = "expected_value_after_3y")]
    ExpectedValueAfter3y,
    #[sea_orm(iden = "expected_value_after_5y")]
    ExpectedValueAfter5y,
    #[sea_orm(iden = "expected_value_after_8y")]
    ExpectedValueAfter8y,
    #[sea_orm(iden = "tco_3_years")]
    Tco3Years,
    #[sea_orm(iden = "tco_5_years")]
    Tco5Years,
    #[sea_orm(iden = "tco_8_years")]
    Tco8Years,
}

#[derive(DeriveIden)]
enum Months {
    Table,
    Id,
    MonthDate,
    StartingFunds,
    EndingFunds,
    Surplus,
    IsCurrent,
    LoanRemaining,
}

#[derive(DeriveIden)]
enum Incomes {
    Table,
    Id,
    MonthId,
    Source,
    Person,
    Amount,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    MonthId,
    Name,
    Category,
    Amount,
}

#[derive(DeriveIden)]
enum LoanAdjustments {
    Table,
    Id,
    MonthId,
    Name,
    Kind,
    Amount,
    Note,
}

#[derive(DeriveIden)]
enum Financing {
    Table,
    Id,
    Name,
    Value,
}
